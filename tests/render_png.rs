mod common;

use camino::Utf8PathBuf;
use migratrack::render::png_sink::{frame_file_name, PngSequence};
use tempfile::TempDir;

use common::{data_file, pipeline};

#[test]
fn test_png_sequence() {
    let dir = TempDir::new().unwrap();
    let frames_dir = Utf8PathBuf::from_path_buf(dir.path().join("frames")).unwrap();

    let animation = pipeline(30).prepare(&data_file("scenario_a.csv")).unwrap();
    let canvas = animation.canvas();
    assert_eq!(canvas.size(), (40, 50));

    let mut sink = PngSequence::create(&frames_dir, canvas).unwrap();
    let frames = animation.render_to(&mut sink).unwrap();

    // Aug 10 to Aug 21.
    assert_eq!(frames, 12);
    assert_eq!(sink.frames_written(), 12);
    let mut names: Vec<String> = std::fs::read_dir(&frames_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], frame_file_name(0));
    assert_eq!(names[11], frame_file_name(11));

    let bytes = std::fs::read(frames_dir.join(frame_file_name(0))).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn test_points_csv() {
    let dir = TempDir::new().unwrap();
    let out = Utf8PathBuf::from_path_buf(dir.path().join("points.csv")).unwrap();

    let animation = pipeline(30).prepare(&data_file("scenario_b.csv")).unwrap();
    animation.write_points_csv(&out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "track_id,species,longitude,latitude,day");
    assert_eq!(lines.len(), 3);
    // 2020-08-10 is day 223.
    assert!(lines[1].starts_with("0,Ciconia ciconia,13.4,52.52,223"));
}
