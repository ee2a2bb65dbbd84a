pub mod announcements;
pub mod elements;
pub mod images;
pub mod links;
pub mod pages;
pub mod public;
pub mod root;
