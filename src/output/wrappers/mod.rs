//! Layout of the individual node kinds, as methods of [`WrapperTree`](super::wrapper::WrapperTree).

mod enclose;
mod frac;
mod misc;
mod radical;
mod scripts;
mod table;
mod token;
