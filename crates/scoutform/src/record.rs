/// One decoded scouting form.
///
/// Field order is the decode order and the ledger column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScoutingRecord {
    pub team: u32,
    #[serde(rename = "match")]
    pub match_number: u32,
    pub auto_start: u32,
    pub auto_cross: u32,
    pub auto_low: u32,
    pub auto_high_outer: u32,
    pub auto_high_inner: u32,
    pub teleop_low: u32,
    pub teleop_high: u32,
    pub shoot_location: u32,
    pub control_panel_2: u32,
    pub control_panel_3: u32,
    pub climb: u32,
    pub foul: u32,
    pub card: u32,
    pub disabled: u32,
    pub played_defense: u32,
}

impl ScoutingRecord {
    /// Non-key fields in ledger column order (everything after match, team).
    pub fn values(&self) -> [u32; 15] {
        [
            self.auto_start,
            self.auto_cross,
            self.auto_low,
            self.auto_high_outer,
            self.auto_high_inner,
            self.teleop_low,
            self.teleop_high,
            self.shoot_location,
            self.control_panel_2,
            self.control_panel_3,
            self.climb,
            self.foul,
            self.card,
            self.disabled,
            self.played_defense,
        ]
    }

    /// File name a successfully recorded photo is filed under.
    pub fn processed_file_name(&self) -> String {
        format!("{}_{}.jpg", self.match_number, self.team)
    }
}
