use md_toc::{
    DeviceInterface, MockDevice, RawTitles, TitleService, TocError, Track, TrackGroup,
};

fn service_with_groups(raw: &str) -> TitleService<MockDevice> {
    let tracks = (0..6).map(|i| Track::new(i, format!("Song {}", i + 1))).collect();
    TitleService::new(MockDevice::new(
        tracks,
        RawTitles {
            half_width: raw.to_string(),
            full_width: String::new(),
        },
    ))
}

#[test]
fn renaming_the_disc_keeps_the_groups() {
    let service = service_with_groups("0;Old//1-2;Intro//");
    service.rename_disc("New // Name", None).expect("rename");

    let device = service.into_inner().expect("lock intact");
    assert_eq!(device.raw_titles().half_width, "0;New  / Name//1-2;Intro//");
}

#[test]
fn deleting_tracks_shifts_groups() {
    let service = service_with_groups("0;Disc//2-3;A//5-6;B//");
    service.delete_tracks(&[0, 3, 3]).expect("delete");

    let disc = service.list_content().expect("listing");
    let titles: Vec<&str> = disc.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Song 2", "Song 3", "Song 5", "Song 6"]);
    assert_eq!(
        disc.groups(),
        [TrackGroup::new("A", 0, 1), TrackGroup::new("B", 2, 3)]
    );
}

#[test]
fn deleting_a_missing_track_erases_nothing() {
    let service = service_with_groups("0;Disc//");
    assert!(matches!(
        service.delete_tracks(&[2, 10]),
        Err(TocError::TrackOutOfRange { index: 10, .. })
    ));
    assert_eq!(service.list_content().expect("listing").tracks().len(), 6);
}

#[test]
fn moving_a_track_can_leave_groups_alone() {
    let service = service_with_groups("0;Disc//1-2;A//");
    service.move_track(5, 0, false).expect("move");
    let disc = service.list_content().expect("listing");
    assert_eq!(disc.tracks()[0].title, "Song 6");
    assert_eq!(disc.groups(), [TrackGroup::new("A", 0, 1)]);

    service.move_track(0, 5, true).expect("move back");
    let disc = service.list_content().expect("listing");
    assert_eq!(disc.tracks()[5].title, "Song 6");
    assert_eq!(disc.groups(), [TrackGroup::new("A", 0, 0)]);
}

#[test]
fn group_lifecycle() {
    let service = service_with_groups("0;Disc//");
    service.add_group(2, 3, "Suite").expect("add");
    service
        .rename_group(2, "Suite No. 1", Some("組曲"))
        .expect("rename");

    let disc = service.list_content().expect("listing");
    assert_eq!(
        disc.groups(),
        [TrackGroup::new("Suite No. 1", 2, 4).with_full_width_title("組曲")]
    );

    assert!(matches!(
        service.add_group(0, 3, "Overlap"),
        Err(TocError::TrackInTwoGroups)
    ));
    assert!(matches!(service.delete_group(0), Err(TocError::GroupNotFound(0))));

    service.delete_group(2).expect("delete");
    assert!(service.list_content().expect("listing").groups().is_empty());
}

#[test]
fn renaming_a_track_sanitizes_both_titles() {
    let service = service_with_groups("");
    service
        .rename_track(1, "ドラム", Some("Drums"))
        .expect("rename");
    let disc = service.list_content().expect("listing");
    assert_eq!(disc.tracks()[1].title, "ﾄﾞﾗﾑ");
    assert_eq!(disc.tracks()[1].full_width_title, "Ｄｒｕｍｓ");
}

#[test]
fn wiping_title_info_clears_disc_title_and_groups() {
    let service = service_with_groups("0;Disc//1-6;All//");
    service.wipe_disc_title_info().expect("wipe");
    let mut device = service.into_inner().expect("lock intact");
    let disc = device.list_content().expect("listing");
    assert_eq!(disc.title, "");
    assert!(disc.groups().is_empty());
    assert_eq!(disc.tracks().len(), 6);
}

#[test]
fn upload_titles_share_the_remaining_room() {
    let long_titles: Vec<Track> = (0..2).map(|i| Track::new(i, "x".repeat(7 * 124))).collect();
    let service = TitleService::new(MockDevice::new(long_titles, RawTitles::default()));

    // 255 cells - 3 for the disc title wrappers - 248 for the tracks.
    let planned = service
        .plan_upload_titles(&["First upload, longer!", "Second upload"], false)
        .expect("plan");
    assert_eq!(planned[0].title, "First upload, longer!");
    assert_eq!(planned[1].title, "Second ");
    assert!(planned.iter().all(|titles| titles.full_width_title.is_empty()));
}

#[test]
fn full_title_table_is_reported() {
    let tracks: Vec<Track> = (0..2).map(|i| Track::new(i, "x".repeat(7 * 126))).collect();
    let service = TitleService::new(MockDevice::new(tracks, RawTitles::default()));
    assert!(matches!(
        service.rename_disc("Anything", None),
        Err(TocError::TitleTableFull)
    ));
}

#[test]
fn rewriting_groups_replaces_the_table() {
    let service = service_with_groups("0;Disc//1-2;Old//");
    service
        .rewrite_groups(vec![TrackGroup::new("New", 3, 5)])
        .expect("rewrite");
    assert_eq!(
        service.list_content().expect("listing").groups(),
        [TrackGroup::new("New", 3, 5)]
    );

    assert!(matches!(
        service.rewrite_groups(vec![TrackGroup::new("Past", 5, 6)]),
        Err(TocError::GroupOutOfRange { .. })
    ));
}

#[test]
fn upload_titles_get_a_full_width_copy_when_asked() {
    let service = TitleService::new(MockDevice::empty());
    let planned = service
        .plan_upload_titles(&["Track One"], true)
        .expect("plan");
    assert_eq!(planned[0].title, "Track One");
    assert_eq!(planned[0].full_width_title, "Ｔｒａｃｋ\u{3000}Ｏｎｅ");
}

#[test]
fn titles_ending_in_a_slash_still_list() {
    let service = service_with_groups("0;Disc//1-2;A//");
    service.rename_disc("AC/DC/", Some("ＡＣ／ＤＣ／")).expect("rename disc");
    service.add_group(3, 2, "Side B/").expect("add group");
    service.rename_group(0, "AC/DC/", None).expect("rename group");

    let disc = service.list_content().expect("listing");
    assert_eq!(disc.title, "AC/DC/ ");
    assert_eq!(disc.full_width_title, "ＡＣ／ＤＣ／\u{3000}");
    assert_eq!(
        disc.groups(),
        [
            TrackGroup::new("AC/DC/ ", 0, 1),
            TrackGroup::new("Side B/ ", 3, 4)
        ]
    );
}
