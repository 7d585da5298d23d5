use md_toc::{
    available_title_chars, compile_disc_titles, half_width_length, parse_disc_titles,
    sanitize_half_width, Disc, Track, TrackGroup, CELL_BYTES,
};

fn empty_tracks(count: usize) -> Vec<Track> {
    (0..count).map(|i| Track::new(i, "")).collect()
}

#[test]
fn group_range_is_written_one_based() {
    let disc = Disc::new("Album", empty_tracks(7), vec![TrackGroup::new("Live", 4, 6)])
        .expect("valid disc");
    let raw = compile_disc_titles(&disc).expect("titles fit");
    assert_eq!(raw.half_width, "0;Album//5-7;Live//");
}

#[test]
fn groups_past_the_remaining_cells_are_left_out() {
    let groups = (0..5)
        .map(|i| TrackGroup::new(format!("Part {}", i + 1), i, i))
        .collect();
    let mut disc = Disc::new("", empty_tracks(5), groups).expect("valid disc");
    disc.title = "d".repeat(250 * CELL_BYTES - "0;//".len());

    let raw = compile_disc_titles(&disc).expect("disc title fits");
    assert!(raw.half_width.starts_with("0;ddd"));
    assert!(raw.half_width.contains("1;Part 1//"));
    for omitted in ["Part 2", "Part 3", "Part 4", "Part 5"] {
        assert!(!raw.half_width.contains(omitted), "{omitted} should not fit");
    }
}

#[test]
fn oversized_disc_title_compiles_to_nothing() {
    let tracks = (0..3).map(|i| Track::new(i, "t".repeat(600))).collect();
    let mut disc = Disc::new("", tracks, vec![]).expect("valid disc");
    disc.title = "x".repeat(100);

    let available = available_title_chars(&disc.with_blank_titles(), false);
    assert!(available < half_width_length(&format!("0;{}//", disc.title)));
    assert!(compile_disc_titles(&disc).is_none());
}

#[test]
fn compiled_titles_read_back_the_same() {
    let disc = Disc::new(
        sanitize_half_width("ガレージ"),
        empty_tracks(5),
        vec![
            TrackGroup::new("One", 0, 1).with_full_width_title("いち"),
            TrackGroup::new("Two", 3, 4).with_full_width_title("に"),
        ],
    )
    .expect("valid disc")
    .with_full_width_title("ガレージ");

    let raw = compile_disc_titles(&disc).expect("titles fit");
    assert_eq!(raw.half_width, "0;ｶﾞﾚｰｼﾞ//1-2;One//4-5;Two//");
    assert_eq!(raw.full_width, "０；ガレージ／／１－２；いち／／４－５；に／／");

    let parsed = parse_disc_titles(&raw.half_width, &raw.full_width, 5).expect("valid titles");
    assert_eq!(parsed.title, disc.title);
    assert_eq!(parsed.full_width_title, disc.full_width_title);
    assert_eq!(parsed.groups, disc.groups());
}
