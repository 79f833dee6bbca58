//! Kernel host recognition from a process command line

use regex::Regex;
use std::sync::OnceLock;

/// Argument fragments that identify a Jupyter kernel host process.
const KERNEL_MARKERS: &[&str] = &["ipykernel_launcher", "ipykernel", "jupyter-kernel"];

fn connection_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"kernel-([A-Za-z0-9_-]+)\.json$").expect("connection file pattern is valid")
    })
}

/// Extract the kernel id from a `kernel-<id>.json` connection file argument.
pub fn kernel_id_from_args<S: AsRef<str>>(args: &[S]) -> Option<String> {
    args.iter().find_map(|arg| {
        connection_file_pattern()
            .captures(arg.as_ref())
            .map(|caps| caps[1].to_string())
    })
}

/// Whether a command line belongs to an interactive kernel host.
pub fn is_kernel_host<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .any(|arg| KERNEL_MARKERS.iter().any(|m| arg.as_ref().contains(m)))
        || kernel_id_from_args(args).is_some()
}
