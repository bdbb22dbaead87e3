//! User interface module - status output for the packaging phases.

pub mod formatter;

pub use formatter::{
    display_branch_match, display_error, display_status, display_success, format_branch_match,
};
