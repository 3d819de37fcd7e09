// Build script for rasshdash - embeds version at compile time

fn main() {
    // Release builds may pin the version through the environment
    let version = std::env::var("RASSH_DASH_VERSION")
        .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=RASSH_DASH_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=RASSH_DASH_VERSION");
}
