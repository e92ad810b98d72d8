use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protos = [
        "proto/match/v1/match.proto",
        "proto/airfare/v1/airfare.proto",
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto);
    }

    // Database migrations are applied at runtime by sqlx::migrate.
    println!("cargo:rerun-if-changed=migrations");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    if env::var_os("PROTOC").is_none() {
        env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("fanflight_descriptor.bin"))
        .compile(&protos, &["proto"])?;

    // prost-build escapes package name segments that are Rust keywords (e.g. "match")
    // as raw identifiers, which leaks into the generated file name (`r#match.v1.rs`)
    // even though `include_proto!` looks for the plain package name.
    for entry in std::fs::read_dir(&out_dir)? {
        let path = entry?.path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(stripped) = name.strip_prefix("r#") {
                std::fs::rename(&path, out_dir.join(stripped))?;
            }
        }
    }

    Ok(())
}
