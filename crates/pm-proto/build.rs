//! Build script for the `pm-proto` crate.
//!
//! ## Purpose
//! Generates Rust types for the billing RPC contract and the patient-change
//! event schema, and emits a file-descriptor set for gRPC reflection.
//!
//! ## Intended use
//! The generated types are shared by the coordinator, the billing client and
//! server, and the analytics consumer; the two `.proto` files are the only
//! contract independently-deployed binaries need to agree on.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let proto_root = std::path::Path::new(manifest_dir);
    let proto_files = [
        proto_root.join("billing.proto"),
        proto_root.join("patient_event.proto"),
    ];

    for proto_file in &proto_files {
        println!("cargo:rerun-if-changed={}", proto_file.display());
    }
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(
            std::path::Path::new(&std::env::var("OUT_DIR")?).join("proto_descriptor.bin"),
        )
        .compile_protos(&proto_files, std::slice::from_ref(&proto_root))?;

    Ok(())
}
