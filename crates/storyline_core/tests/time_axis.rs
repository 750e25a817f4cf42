use storyline_core::{
    position_to_tag, position_to_tag_for_row, tag_for_unit, tag_to_position, Granularity,
    TimeTag,
};

#[test]
fn reference_positions_match_unit_scale() {
    assert_eq!(tag_to_position("YEAR:2003", Granularity::Year), 300);
    assert_eq!(tag_to_position("MONTH:JAN-2001", Granularity::Month), 1200);
    assert_eq!(
        tag_for_unit(7, Granularity::Day).unwrap().to_string(),
        "DAY:2000-01-08"
    );
}

#[test]
fn generated_tags_map_back_to_their_unit_at_every_zoom() {
    for zoom in Granularity::ALL {
        for unit in [-30_i64, -1, 0, 1, 7, 45, 1_000] {
            let tag = tag_for_unit(unit, zoom).unwrap();
            assert_eq!(
                tag_to_position(&tag.to_string(), zoom),
                unit * 100,
                "zoom={zoom} unit={unit} tag={tag}"
            );
        }
    }
}

#[test]
fn positions_inside_a_unit_generate_the_same_tag() {
    let left = position_to_tag(1_200, Granularity::Month).unwrap();
    let right = position_to_tag(1_299, Granularity::Month).unwrap();
    assert_eq!(left, right);
    assert_eq!(left.to_string(), "MONTH:JAN-2001");
}

#[test]
fn coarse_tags_reproject_onto_finer_zooms() {
    // 2001-01-01 is 366 days after the epoch.
    assert_eq!(tag_to_position("YEAR:2001", Granularity::Day), 36_600);
    assert_eq!(tag_to_position("YEAR:2001", Granularity::Month), 1_200);
    assert_eq!(tag_to_position("DAY:2000-01-15", Granularity::Week), 200);
}

#[test]
fn month_row_drop_at_hour_zoom_names_the_month() {
    // 2005-03-17 is 1902 days after the epoch; 1pm on that day.
    let position = (1_902 * 24 + 13) * 100;
    let tag = position_to_tag_for_row(position, Granularity::Hour, Granularity::Month).unwrap();
    assert_eq!(tag.to_string(), "MONTH:MAR-2005");
}

#[test]
fn week_row_drop_snaps_to_sunday_unlike_plain_generation() {
    // Unit 0 at DAY zoom is Saturday 2000-01-01.
    let plain = position_to_tag(0, Granularity::Week).unwrap();
    let row = position_to_tag_for_row(0, Granularity::Day, Granularity::Week).unwrap();
    assert_eq!(plain.to_string(), "WEEK:2000-01-01");
    assert_eq!(row.to_string(), "WEEK:1999-12-26");
}

#[test]
fn tags_survive_serde_as_strings() {
    let tag: TimeTag = "HOUR:2000-01-02 3pm".parse().unwrap();
    let json = serde_json::to_string(&tag).unwrap();
    assert_eq!(json, "\"HOUR:2000-01-02 3pm\"");
    let back: TimeTag = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tag);
}
