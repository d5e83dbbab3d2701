//! Shared fixtures for unit tests.

use std::net::SocketAddr;

use axum::Router;
use serde_json::{json, Value};

/// A complete, schema-conforming completion response for Aspirin.
pub fn sample_drug_json() -> Value {
    json!({
        "id": "aspirin-us-001",
        "region": ["US"],
        "identifiers": {
            "rxCui": "1191",
            "atc": ["N02BA01", "B01AC06"],
            "cas": ["50-78-2"]
        },
        "generic_name": "Aspirin",
        "brand_names": ["Bayer"],
        "class": ["NSAID"],
        "mechanism_of_action": "Aspirin blocks the COX enzymes that make prostaglandins. This lowers pain, fever and inflammation. It also stops platelets from clumping.",
        "indications": ["Mild to moderate pain", "Fever", "Secondary prevention of myocardial infarction"],
        "dosing_adult": ["Pain: 325-650 mg every 4-6 hours as needed", "Cardioprotection: 81 mg once daily"],
        "dosing_pediatric": ["Not recommended under 16 years due to Reye's syndrome risk"],
        "contraindications": ["Active peptic ulcer", "Bleeding disorders"],
        "warnings": ["Increased bleeding risk with anticoagulants"],
        "adverse_effects": {
            "common": ["Dyspepsia", "Nausea"],
            "serious": ["⚠️ Gastrointestinal bleeding", "⚠️ Anaphylaxis"]
        },
        "interactions": {
            "severe": ["Warfarin"],
            "moderate": ["Ibuprofen"],
            "minor": ["Antacids"],
            "alcohol": ["Increases stomach bleeding risk"]
        },
        "pregnancy_lactation": "Avoid in the third trimester.",
        "renal_hepatic_adjustment": "Avoid in severe renal impairment.",
        "alternatives": {
            "generic_equivalents": ["Acetylsalicylic acid"],
            "therapeutic_alternatives": [
                {"name": "Clopidogrel", "difference": "P2Y12 inhibitor, no COX effect"}
            ]
        },
        "references": [
            {"source": "FDA Drug Label (2023)", "url": "https://www.fda.gov/drugs", "date_accessed": "2024-05-01"}
        ],
        "quick_warnings": ["Bleeding risk", "Reye's syndrome in children"],
        "availability": "OTC"
    })
}

/// Serialize the sample with one top-level field removed.
pub fn sample_drug_without(field: &str) -> String {
    let mut value = sample_drug_json();
    if let Some(obj) = value.as_object_mut() {
        obj.remove(field);
    }
    value.to_string()
}

/// Run `router` on an ephemeral localhost port in a dedicated thread with its
/// own runtime. Blocking HTTP clients can then be exercised from a plain
/// `#[test]`. Returns the base URL.
pub fn spawn_stub(router: Router) -> String {
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    let addr = rx.recv().unwrap();
    format!("http://{addr}")
}
