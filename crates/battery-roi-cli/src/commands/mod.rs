pub mod roi;
pub mod sanity;
pub mod sensitivity;
