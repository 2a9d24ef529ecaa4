use check_engine::{
    Ability, AdvantageState, Character, CheckError, CheckRequest, CheckResolution, DcBand, Dice,
    Outcome, ResolveCheckPayload, resolve_check,
};

fn sneaky_rogue() -> Character {
    Character::new(3)
        .with_stat(Ability::Dexterity, 14)
        .with_skill("Stealth")
}

fn stealth_request() -> CheckRequest {
    CheckRequest::new(Ability::Dexterity, 13)
        .with_skill("Stealth")
        .with_advantage(AdvantageState::Advantage)
}

#[test]
fn stealth_with_advantage_end_to_end() {
    let mut dice = Dice::from_scripted(vec![11, 17]).unwrap();
    let out = resolve_check(&mut dice, &sneaky_rogue(), &stealth_request(), None).unwrap();

    let roll = out.player_roll;
    assert_eq!(roll.d20_roll, 17);
    assert_eq!(roll.advantage_rolls, Some([11, 17]));
    assert_eq!(roll.ability_modifier, 2);
    assert_eq!(roll.proficiency_bonus, 2);
    assert_eq!(roll.other_bonuses, 0);
    assert_eq!(roll.modifier, 4);
    assert_eq!(roll.total, 21);
    assert_eq!(roll.advantage_state, AdvantageState::Advantage);

    assert_eq!(out.resolution.margin, 8);
    assert!(out.resolution.success);
    assert_eq!(out.resolution.outcome, Outcome::ClearSuccess);
}

#[test]
fn manual_roll_resolves_without_dice() {
    let mut dice = Dice::from_scripted(vec![1]).unwrap();
    let out = resolve_check(&mut dice, &sneaky_rogue(), &stealth_request(), Some(9)).unwrap();
    assert_eq!(out.player_roll.d20_roll, 9);
    assert_eq!(out.player_roll.advantage_rolls, None);
    assert_eq!(out.player_roll.total, 13);
    assert_eq!(out.resolution.outcome, Outcome::MarginalSuccess);
}

#[test]
fn invalid_manual_roll_stops_resolution() {
    let mut dice = Dice::from_seed(1);
    let err = resolve_check(&mut dice, &sneaky_rogue(), &stealth_request(), Some(21)).unwrap_err();
    assert_eq!(err, CheckError::InvalidRoll(21));
}

#[test]
fn empty_snapshot_resolves_with_neutral_modifier() {
    let character: Character = serde_json::from_str("{}").unwrap();
    let mut dice = Dice::from_scripted(vec![10]).unwrap();
    let out = resolve_check(&mut dice, &character, &stealth_request(), None).unwrap();
    assert_eq!(out.player_roll.d20_roll, 10);
    assert_eq!(out.player_roll.modifier, 0);
    assert_eq!(out.resolution.outcome, Outcome::MarginalFailure);
}

#[test]
fn resolution_recomputes_from_stored_roll() {
    let mut dice = Dice::from_scripted(vec![11, 17]).unwrap();
    let out = resolve_check(&mut dice, &sneaky_rogue(), &stealth_request(), None).unwrap();
    assert_eq!(CheckResolution::derive(13, &out.player_roll), out.resolution);
}

#[test]
fn request_parses_from_backend_json() {
    let req = CheckRequest::from_json(
        r#"{
            "ability": "dexterity",
            "skill": "Stealth",
            "dc": 13,
            "dc_band": "moderate",
            "advantage_state": "advantage",
            "action_context": "slip past the guards",
            "reason": "the guards are alert"
        }"#,
    )
    .unwrap();
    assert_eq!(req.ability, Ability::Dexterity);
    assert_eq!(req.advantage_state, AdvantageState::Advantage);
    assert_eq!(req.other_bonuses, 0);
    assert_eq!(req.dc_band, Some(DcBand::Moderate));
}

#[test]
fn unrecognised_dc_band_is_dropped() {
    let req = CheckRequest::from_json(
        r#"{"ability": "dex", "dc": 32, "dc_band": "impossible"}"#,
    )
    .unwrap();
    assert_eq!(req.dc, 32);
    assert_eq!(req.dc_band, None);
    assert_eq!(req.band(), DcBand::NearlyImpossible);

    let req = CheckRequest::from_json(r#"{"ability": "dex", "dc": 8, "dc_band": null}"#).unwrap();
    assert_eq!(req.dc_band, None);
    let req = CheckRequest::from_yaml("ability: dex\ndc: 8\ndc_band: 7\n").unwrap();
    assert_eq!(req.dc_band, None);
}

#[test]
fn request_without_ability_or_dc_is_rejected() {
    assert!(CheckRequest::from_json(r#"{"dc": 10}"#).is_err());
    assert!(CheckRequest::from_json(r#"{"ability": "wisdom"}"#).is_err());
    assert!(CheckRequest::from_json(r#"{"ability": "luck", "dc": 10}"#).is_err());
    assert!(CheckRequest::from_json(r#"{"ability": "wis", "dc": 10, "advantage_state": "double"}"#).is_err());
}

#[test]
fn request_parses_from_yaml() {
    let req = CheckRequest::from_yaml("ability: cha\nskill: Persuasion\ndc: 15\n").unwrap();
    assert_eq!(req.ability, Ability::Charisma);
    assert_eq!(req.skill.as_deref(), Some("Persuasion"));
}

#[test]
fn summary_line() {
    let mut dice = Dice::from_scripted(vec![11, 17]).unwrap();
    let out = resolve_check(&mut dice, &sneaky_rogue(), &stealth_request(), None).unwrap();
    insta::assert_snapshot!(
        out.player_roll.summary(13),
        @"d20=11 vs d20=17 (keep=17) +4 = 21 vs DC 13 → clear_success"
    );
}

#[test]
fn payload_body_shape() {
    let mut dice = Dice::from_scripted(vec![11, 17]).unwrap();
    let request = stealth_request();
    let out = resolve_check(&mut dice, &sneaky_rogue(), &request, None).unwrap();
    let payload = ResolveCheckPayload::new("c-1", "camp-9", out.player_roll, request);
    assert_eq!(payload.resolution(), out.resolution);
    insta::assert_snapshot!(
        payload.to_json().unwrap(),
        @r#"{"character_id":"c-1","campaign_id":"camp-9","player_roll":{"d20_roll":17,"advantage_rolls":[11,17],"ability_modifier":2,"proficiency_bonus":2,"other_bonuses":0,"modifier":4,"total":21,"advantage_state":"advantage"},"check_request":{"ability":"dexterity","skill":"Stealth","dc":13,"advantage_state":"advantage"}}"#
    );
}

#[test]
fn normal_roll_serializes_null_advantage_rolls() {
    let mut dice = Dice::from_scripted(vec![8]).unwrap();
    let request = CheckRequest::new(Ability::Dexterity, 10);
    let out = resolve_check(&mut dice, &sneaky_rogue(), &request, None).unwrap();
    let json = serde_json::to_value(out.player_roll).unwrap();
    assert!(json["advantage_rolls"].is_null());
    assert_eq!(json["advantage_state"], "normal");
}
