mod common;

use approx::assert_relative_eq;
use migratrack::{
    frames::{projector::FrameState, DayRange},
    palette::Rgb,
};

use common::{data_file, pipeline};

fn grus_alpha(frame: &FrameState) -> Option<f64> {
    frame
        .batches
        .iter()
        .find(|b| b.species == "Grus grus")
        .map(|b| b.points[0].alpha)
}

#[test]
fn test_point_visible_for_window_days() {
    let animation = pipeline(30).prepare(&data_file("fade_window.csv")).unwrap();

    // 2019-02-19 and 2019-03-30 land on days 50 and 90 of 2020.
    assert_eq!(animation.day_range(), DayRange { first: 50, last: 90 });

    let frames: Vec<FrameState> = animation.projector().unwrap().frames().collect();
    assert_eq!(frames.len(), 41);
    assert_eq!(frames[0].date_label, "February 19");
    assert_eq!(frames[40].date_label, "March 30");

    for frame in &frames {
        let alpha = grus_alpha(frame);
        match frame.day {
            50 => assert_eq!(alpha, Some(1.0)),
            51..=79 => {
                let expected = 1.0 - f64::from(frame.day - 50) / 30.0;
                assert_relative_eq!(alpha.unwrap(), expected, epsilon = 1e-12);
                assert!(alpha.unwrap() > 0.0);
            }
            80 => assert_eq!(alpha, Some(0.0)),
            _ => assert_eq!(alpha, None, "day {}", frame.day),
        }
    }
}

#[test]
fn test_alpha_never_increases_with_age() {
    let animation = pipeline(7).prepare(&data_file("fade_window.csv")).unwrap();
    let projector = animation.projector().unwrap();
    let alphas: Vec<f64> = (50..=57)
        .filter_map(|day| grus_alpha(&projector.project(day)))
        .collect();
    assert_eq!(alphas.len(), 8);
    assert!(alphas.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(alphas[7], 0.0);
}

#[test]
fn test_species_keep_their_color() {
    let animation = pipeline(60).prepare(&data_file("fade_window.csv")).unwrap();
    let palette = animation.palette();
    assert_eq!(palette.color("Anser anser"), Some(Rgb(0x1f, 0x77, 0xb4)));
    assert_eq!(palette.color("Grus grus"), Some(Rgb(0xff, 0x7f, 0x0e)));

    for frame in animation.projector().unwrap().frames() {
        for batch in &frame.batches {
            assert_eq!(Some(batch.color), palette.color(&batch.species));
        }
    }
}
