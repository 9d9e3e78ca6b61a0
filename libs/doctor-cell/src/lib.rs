pub mod models;
pub mod services;
pub mod views;

pub use models::{DoctorCardView, DoctorDetailsView, DoctorListView, NormalizedDoctor};
pub use services::{DoctorDirectory, FindDoctorsPage};
