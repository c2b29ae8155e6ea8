pub mod clock;
pub mod image;
pub mod nav;
pub mod validation;
