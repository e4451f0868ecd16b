//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `kalamar_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use kalamar_core::{AccessPointConfig, FormatRegistry, NewItem, BINARY_FORMAT};
use std::process::ExitCode;
use std::rc::Rc;

fn main() -> ExitCode {
    let registry = FormatRegistry::with_builtin_formats();
    println!("kalamar_core version={}", kalamar_core::core_version());
    println!("kalamar_core formats={}", registry.formats().join(","));

    let mut access_point = AccessPointConfig::new("smoke");
    access_point.parser = Some(BINARY_FORMAT.to_string());

    let item = match registry.create_item(
        Rc::new(access_point),
        NewItem::new().with_content(b"kalamar".to_vec()),
    ) {
        Ok(item) => item,
        Err(err) => {
            eprintln!("kalamar_core create_item failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match item.serialize() {
        Ok(bytes) => {
            println!("kalamar_core binary_roundtrip_bytes={}", bytes.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("kalamar_core serialize failed: {err}");
            ExitCode::FAILURE
        }
    }
}
