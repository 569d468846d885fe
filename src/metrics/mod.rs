pub mod bands;
pub mod engine;

pub use bands::{weakest_subject_band, Band};
pub use engine::{
    class_summary, radar_profile, round1, subject_average, subject_averages, top_n, ClassSummary,
    SubjectAverage,
};
