pub mod request;
pub mod sheet;
pub mod source;
pub mod validation;

pub use request::{load_request, FamilyRequest, ReportRequest};
pub use sheet::{parse_delimiter, parse_sheet, read_sheet, sheet_delimiter};
pub use source::{resolve_source, FamilySource};
pub use validation::validate_request;
