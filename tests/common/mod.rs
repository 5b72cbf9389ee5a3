use camino::Utf8PathBuf;
use migratrack::{migratrack::Migratrack, params::AnimationParams};

pub fn data_file(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn pipeline(fade_window_days: u32) -> Migratrack {
    let params = AnimationParams::builder()
        .fade_window_days(fade_window_days)
        .resolution_dpi(5)
        .build()
        .unwrap();
    Migratrack::new(params)
}
