pub mod age;
pub mod feedback;
pub mod item;
pub mod text;
