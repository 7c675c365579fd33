//! Build script for the EventPass API
//!
//! Compiles the Protocol Buffer definitions into Rust code using
//! tonic-prost-build. The generated code provides the gRPC service traits,
//! server and client stubs, and message types.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::configure()
        .build_server(true)
        // Client stubs for Rust callers of the services
        .build_client(true)
        .compile_protos(&["proto/eventpass.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/eventpass.proto");

    Ok(())
}
