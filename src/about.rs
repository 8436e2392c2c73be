pub const GBGENES_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GBGENES_BUILD_N: &str = env!("GBGENES_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "gbgenes {}\nBuild {}\nGenBank CDS feature-table extractor",
        GBGENES_VERSION, GBGENES_BUILD_N
    )
}
