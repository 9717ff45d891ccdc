pub mod commit_access;
pub mod compute_access;
pub mod fetch;

use teamsync_core::WriteResult;

/// One status line for a hash-gated artifact write.
pub(crate) fn print_write(result: &WriteResult) {
    match result {
        WriteResult::Written { path } => println!("  ✎  {}", path.display()),
        WriteResult::Unchanged { path } => println!("  ·  {} (unchanged)", path.display()),
    }
}
