pub mod report_viewmodel;
pub mod map_viewmodel;

pub use report_viewmodel::{RefreshOutcome, ReportViewModel, SubmitOutcome};
pub use map_viewmodel::{MapMarker, MapRegion, MapViewModel};
