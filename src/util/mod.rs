//! Generic collections used by the filter chains, the render pipeline and the math-item list.

pub mod prioritized;
pub mod function_list;
pub mod linked_list;

pub use self::prioritized::{PrioritizedList, DEFAULT_PRIORITY};
pub use self::function_list::{FunctionList, FilterResult, Execution};
pub use self::linked_list::LinkedList;
