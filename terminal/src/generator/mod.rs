pub mod camera;
pub mod profile;
