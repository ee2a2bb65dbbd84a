pub mod announcement;
pub mod editor;
pub mod form;
pub mod link;
pub mod page;

pub use announcement::*;
pub use editor::*;
pub use form::*;
pub use link::*;
pub use page::*;
