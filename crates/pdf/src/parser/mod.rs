pub mod backend;
pub mod matrix;
pub mod outline;
pub mod path;
pub mod text;
