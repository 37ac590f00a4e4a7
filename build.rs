//! Retrieves information about the version of the library from Git and the
//! build environment. `shadow!(build)` in `src/lib.rs` exposes it at runtime,
//! the CLI prints it on startup.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
