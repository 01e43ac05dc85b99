use af_core::{LifeStage, StageName, Unit};
use af_normalize::{StageBody, normalize};
use serde_json::json;

#[test]
fn stage7_reads_mixed_payload_shapes() {
    let payload = json!({
        "biofilter": {
            "media_volume_m3": {"value": 3.2},
            "vtr": "450"
        },
        "total_flow_m3_hr": 120.0,
        "system": {"total_volume_m3": 85.0},
        "stage1_tank_volume": 4.5,
        "fingerling": {"vessel": {"count": 6}},
        "growout": {"sump": {"volume_m3": 12.0}}
    });

    let sub = normalize(StageName::Stage7, &payload);
    let StageBody::Stage7(s7) = &sub.body else {
        panic!("expected stage7 body");
    };

    assert_eq!(s7.biofilter.get("biofilter.media_volume").unwrap().value, Some(3.2));
    assert_eq!(s7.biofilter.get("biofilter.vtr").unwrap().unit, Unit::GPerM3Day);
    assert_eq!(s7.biofilter.get("biofilter.vtr").unwrap().value, Some(450.0));
    let lpm = s7.overview.get("overview.total_flow_lpm").unwrap().value.unwrap();
    assert!((lpm - 2000.0).abs() < 1e-9);
    assert_eq!(s7.overview.get("overview.system_volume").unwrap().value, Some(85.0));

    assert_eq!(s7.vessels.len(), 3);
    assert_eq!(s7.vessels[0].life_stage, LifeStage::Juvenile);
    assert_eq!(s7.vessels[0].metrics.get("juvenile.tank_volume").unwrap().value, Some(4.5));
    assert_eq!(s7.vessels[1].metrics.get("fingerling.tank_count").unwrap().value, Some(6.0));
    assert_eq!(s7.vessels[2].metrics.get("growout.sump_volume").unwrap().value, Some(12.0));
    assert_eq!(s7.vessels[2].metrics.get("growout.tank_depth").unwrap().value, None);
}

#[test]
fn stage3_applies_temperature_default_only_when_absent() {
    let defaulted = normalize(StageName::Stage3, &json!({"ph": 7.2}));
    assert_eq!(defaulted.metric("targets.temperature").unwrap().value, Some(25.0));
    assert_eq!(defaulted.metric("targets.ph").unwrap().value, Some(7.2));

    let reported = normalize(StageName::Stage3, &json!({"temperature_c": 18.0}));
    assert_eq!(reported.metric("targets.temperature").unwrap().value, Some(18.0));
}

#[test]
fn normalization_is_pure() {
    let payload = json!({"stage1_pump_flow_m3_hr": 30.0, "juvenile": {"pump": {"power_kw": 2.2}}});
    let a = normalize(StageName::Stage8, &payload);
    let b = normalize(StageName::Stage8, &payload);
    assert_eq!(a, b);
}

#[test]
fn sub_report_serializes_with_unit_labels() {
    let sub = normalize(StageName::Basic, &json!({"o2_saturation_adjusted_mg_l": 8.5}));
    let json = serde_json::to_value(&sub).unwrap();
    assert_eq!(json["stage"], "basic");
    assert_eq!(json["body"]["stage"], "basic");
    assert_eq!(json["body"]["data"]["oxygen"]["saturation"]["unit"], "mg/L");
    assert_eq!(json["body"]["data"]["oxygen"]["saturation"]["value"], 8.5);
}
