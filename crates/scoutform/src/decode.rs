//! Mapping of per-row selections onto named form fields.
//!
//! Row indices, digit rows, and override chains come from a [`FieldMap`];
//! a new form revision is a new table, not new code.

use crate::error::{Error, Result};
use crate::fill::RowSelection;
use crate::record::ScoutingRecord;

/// One row in an override chain and the value added when it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RowSource {
    pub row: usize,
    #[serde(default)]
    pub offset: u32,
}

impl RowSource {
    pub const fn new(row: usize, offset: u32) -> Self {
        Self { row, offset }
    }
}

/// Grid-row positions of every form field.
///
/// Teleop counts use override chains: the first row in the chain with a mark
/// wins and contributes `selection + offset`. A printed scale that continues
/// onto a second row is expressed as `[second_row (+first_row_len), first_row]`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldMap {
    /// Rows read as base-10 digits (most significant first), value = column - 1.
    pub team_rows: Vec<usize>,
    pub match_rows: Vec<usize>,
    pub auto_start: usize,
    pub auto_cross: usize,
    pub auto_low: usize,
    pub auto_high_outer: usize,
    pub auto_high_inner: usize,
    pub teleop_low: Vec<RowSource>,
    pub teleop_high: Vec<RowSource>,
    pub shoot_location: usize,
    /// Reject forms with no shoot-location mark.
    #[serde(default = "default_true")]
    pub shoot_location_required: bool,
    pub control_panel_2: usize,
    pub control_panel_3: usize,
    pub climb: usize,
    pub foul: usize,
    pub card: usize,
    pub disabled: usize,
    pub played_defense: usize,
}

fn default_true() -> bool {
    true
}

impl FieldMap {
    /// Field table of the original (contour-detected, 219-bubble) form.
    pub fn contour_v1() -> Self {
        Self {
            team_rows: vec![0, 1, 2, 3],
            match_rows: vec![4, 5, 6],
            auto_start: 7,
            auto_cross: 8,
            auto_low: 9,
            auto_high_outer: 10,
            auto_high_inner: 11,
            teleop_low: vec![RowSource::new(13, 0), RowSource::new(12, 0)],
            teleop_high: vec![
                RowSource::new(16, 0),
                RowSource::new(15, 0),
                RowSource::new(14, 0),
            ],
            shoot_location: 17,
            shoot_location_required: true,
            control_panel_2: 18,
            control_panel_3: 19,
            climb: 20,
            foul: 21,
            card: 22,
            disabled: 23,
            played_defense: 24,
        }
    }

    /// Field table of the revised (blob-detected, 220-bubble) form, where the
    /// second teleop row of each goal continues the 17-bubble scale.
    pub fn blob_v2() -> Self {
        Self {
            teleop_low: vec![RowSource::new(13, 17), RowSource::new(12, 0)],
            teleop_high: vec![
                RowSource::new(16, 17),
                RowSource::new(15, 0),
                RowSource::new(14, 0),
            ],
            shoot_location_required: false,
            ..Self::contour_v1()
        }
    }

    /// Every row index the table reads.
    pub fn referenced_rows(&self) -> Vec<usize> {
        let mut rows = Vec::new();
        rows.extend(&self.team_rows);
        rows.extend(&self.match_rows);
        rows.extend([
            self.auto_start,
            self.auto_cross,
            self.auto_low,
            self.auto_high_outer,
            self.auto_high_inner,
            self.shoot_location,
            self.control_panel_2,
            self.control_panel_3,
            self.climb,
            self.foul,
            self.card,
            self.disabled,
            self.played_defense,
        ]);
        rows.extend(self.teleop_low.iter().map(|s| s.row));
        rows.extend(self.teleop_high.iter().map(|s| s.row));
        rows
    }

    pub(crate) fn validate(&self, n_rows: usize) -> std::result::Result<(), String> {
        if self.team_rows.is_empty() || self.match_rows.is_empty() {
            return Err("team_rows and match_rows must not be empty".to_string());
        }
        // u32 holds 9 decimal digits.
        if self.team_rows.len() > 9 || self.match_rows.len() > 9 {
            return Err("at most 9 digit rows per number".to_string());
        }
        if let Some(bad) = self.referenced_rows().into_iter().find(|&r| r >= n_rows) {
            return Err(format!(
                "field map references row {bad} but the layout has {n_rows} rows"
            ));
        }
        Ok(())
    }
}

/// Number read from digit rows; `None` when any digit row is blank.
fn compose_digits(
    selections: &[RowSelection],
    rows: &[usize],
    field: &str,
) -> Result<Option<u32>> {
    let mut acc = 0u32;
    for &r in rows {
        let Some(col) = selections[r] else {
            return Ok(None);
        };
        acc = acc
            .checked_mul(10)
            .and_then(|a| a.checked_add(col.saturating_sub(1)))
            .ok_or_else(|| Error::Layout(format!("{field} digits overflow u32")))?;
    }
    Ok(Some(acc))
}

fn first_in_chain(selections: &[RowSelection], chain: &[RowSource], field: &str) -> Result<u32> {
    let Some((v, s)) = chain
        .iter()
        .find_map(|s| selections[s.row].map(|v| (v, s)))
    else {
        return Ok(0);
    };
    v.checked_add(s.offset)
        .ok_or_else(|| Error::Layout(format!("{field} offset {} overflows u32", s.offset)))
}

/// Decode classified rows into a record.
///
/// Mandatory fields are checked in the order team, match, autoStart,
/// shootLocation; the first one without a mark is reported.
pub fn decode(selections: &[RowSelection], fields: &FieldMap) -> Result<ScoutingRecord> {
    fields
        .validate(selections.len())
        .map_err(Error::Layout)?;

    let opt = |row: usize| selections[row].unwrap_or(0);

    let team = compose_digits(selections, &fields.team_rows, "team")?
        .ok_or(Error::IncompleteForm { field: "team" })?;
    let match_number = compose_digits(selections, &fields.match_rows, "match")?
        .ok_or(Error::IncompleteForm { field: "match" })?;
    let auto_start =
        selections[fields.auto_start].ok_or(Error::IncompleteForm { field: "autoStart" })?;
    let shoot_location = match selections[fields.shoot_location] {
        Some(v) => v,
        None if fields.shoot_location_required => {
            return Err(Error::IncompleteForm {
                field: "shootLocation",
            })
        }
        None => 0,
    };

    Ok(ScoutingRecord {
        team,
        match_number,
        auto_start,
        auto_cross: opt(fields.auto_cross),
        auto_low: opt(fields.auto_low),
        auto_high_outer: opt(fields.auto_high_outer),
        auto_high_inner: opt(fields.auto_high_inner),
        teleop_low: first_in_chain(selections, &fields.teleop_low, "teleop_low")?,
        teleop_high: first_in_chain(selections, &fields.teleop_high, "teleop_high")?,
        shoot_location,
        control_panel_2: opt(fields.control_panel_2),
        control_panel_3: opt(fields.control_panel_3),
        climb: opt(fields.climb),
        foul: opt(fields.foul),
        card: opt(fields.card),
        disabled: opt(fields.disabled),
        played_defense: opt(fields.played_defense),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: usize = 25;

    /// Mandatory rows marked, everything else blank.
    fn minimal(team: [u32; 4], match_digits: [u32; 3]) -> Vec<RowSelection> {
        let mut s = vec![None; ROWS];
        for (i, d) in team.iter().enumerate() {
            s[i] = Some(*d);
        }
        for (i, d) in match_digits.iter().enumerate() {
            s[4 + i] = Some(*d);
        }
        s[7] = Some(2);
        s[17] = Some(1);
        s
    }

    #[test]
    fn team_and_match_digit_composition() {
        let fields = FieldMap::contour_v1();
        let rec = decode(&minimal([2, 1, 2, 5], [1, 2, 3]), &fields).unwrap();
        assert_eq!(rec.team, 1014);
        assert_eq!(rec.match_number, 12);

        let rec = decode(&minimal([2, 1, 4, 6], [10, 10, 10]), &fields).unwrap();
        assert_eq!(rec.team, 1035);
        assert_eq!(rec.match_number, 999);
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let rec = decode(&minimal([1, 1, 1, 2], [1, 1, 2]), &FieldMap::contour_v1()).unwrap();
        assert_eq!(rec.team, 1);
        assert_eq!(rec.auto_start, 2);
        assert_eq!(rec.shoot_location, 1);
        assert_eq!(rec.values()[1..7], [0; 6]);
        assert_eq!(rec.climb, 0);
        assert_eq!(rec.played_defense, 0);
    }

    #[test]
    fn optional_fields_read_their_rows() {
        let mut s = minimal([1, 2, 5, 5], [1, 1, 4]);
        s[8] = Some(1);
        s[9] = Some(3);
        s[10] = Some(4);
        s[11] = Some(5);
        s[18] = Some(1);
        s[19] = Some(1);
        s[20] = Some(3);
        s[21] = Some(7);
        s[22] = Some(2);
        s[23] = Some(1);
        s[24] = Some(1);
        let rec = decode(&s, &FieldMap::contour_v1()).unwrap();
        assert_eq!(
            rec.values(),
            [2, 1, 3, 4, 5, 0, 0, 1, 1, 1, 3, 7, 2, 1, 1]
        );
    }

    #[test]
    fn missing_auto_start_is_reported_by_name() {
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[7] = None;
        // Shoot location also blank: auto start is checked first.
        s[17] = None;
        match decode(&s, &FieldMap::contour_v1()) {
            Err(Error::IncompleteForm { field }) => assert_eq!(field, "autoStart"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn first_missing_mandatory_field_wins() {
        let fields = FieldMap::contour_v1();
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[2] = None;
        s[5] = None;
        s[7] = None;
        assert!(matches!(
            decode(&s, &fields),
            Err(Error::IncompleteForm { field: "team" })
        ));

        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[6] = None;
        assert!(matches!(
            decode(&s, &fields),
            Err(Error::IncompleteForm { field: "match" })
        ));

        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[17] = None;
        assert!(matches!(
            decode(&s, &fields),
            Err(Error::IncompleteForm {
                field: "shootLocation"
            })
        ));
    }

    #[test]
    fn shoot_location_optional_in_revised_layout() {
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[17] = None;
        let rec = decode(&s, &FieldMap::blob_v2()).unwrap();
        assert_eq!(rec.shoot_location, 0);
    }

    #[test]
    fn second_half_teleop_high_adds_offset() {
        let fields = FieldMap::blob_v2();
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[16] = Some(4);
        s[15] = Some(12);
        assert_eq!(decode(&s, &fields).unwrap().teleop_high, 21);

        s[15] = None;
        assert_eq!(decode(&s, &fields).unwrap().teleop_high, 21);

        s[16] = None;
        s[15] = Some(9);
        assert_eq!(decode(&s, &fields).unwrap().teleop_high, 9);

        s[15] = None;
        assert_eq!(decode(&s, &fields).unwrap().teleop_high, 0);
    }

    #[test]
    fn original_chain_prefers_later_rows_without_offset() {
        let fields = FieldMap::contour_v1();
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[12] = Some(6);
        s[13] = Some(2);
        s[14] = Some(5);
        s[16] = Some(3);
        let rec = decode(&s, &fields).unwrap();
        assert_eq!(rec.teleop_low, 2);
        assert_eq!(rec.teleop_high, 3);

        s[13] = None;
        s[16] = None;
        let rec = decode(&s, &fields).unwrap();
        assert_eq!(rec.teleop_low, 6);
        assert_eq!(rec.teleop_high, 5);
    }

    #[test]
    fn oversized_digit_values_are_a_layout_error() {
        let mut fields = FieldMap::contour_v1();
        fields.team_rows = (0..9).collect();
        fields.match_rows = vec![9];
        fields.auto_start = 10;
        for f in [
            &mut fields.auto_cross,
            &mut fields.auto_low,
            &mut fields.auto_high_outer,
            &mut fields.auto_high_inner,
            &mut fields.shoot_location,
            &mut fields.control_panel_2,
            &mut fields.control_panel_3,
            &mut fields.climb,
            &mut fields.foul,
            &mut fields.card,
            &mut fields.disabled,
            &mut fields.played_defense,
        ] {
            *f = 10;
        }
        fields.teleop_low = vec![RowSource::new(10, 0)];
        fields.teleop_high = vec![RowSource::new(10, 0)];
        fields.validate(11).unwrap();

        let s = vec![Some(50); 11];
        let err = decode(&s, &fields).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Layout);
        assert!(err.to_string().contains("team digits overflow"), "{err}");
    }

    #[test]
    fn chain_offset_overflow_is_a_layout_error() {
        let mut fields = FieldMap::blob_v2();
        fields.teleop_high = vec![RowSource::new(16, u32::MAX)];
        let mut s = minimal([2, 1, 2, 5], [1, 2, 3]);
        s[16] = Some(3);
        let err = decode(&s, &fields).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Layout);
    }

    #[test]
    fn short_selection_vector_is_a_layout_error() {
        let s = vec![Some(1); 10];
        let err = decode(&s, &FieldMap::contour_v1()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Layout);
    }
}
