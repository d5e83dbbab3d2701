//! Localized strings for the drug lookup screen.

use serde::Serialize;

use crate::lookup::{Language, Region};

/// Every user-visible string of the lookup screen in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTexts {
    pub title: &'static str,
    pub search_placeholder: &'static str,
    pub search_button: &'static str,
    pub loading: &'static str,
    /// The only message a user ever sees for a failed lookup.
    pub error: &'static str,
    pub initial_message: &'static str,
    pub disclaimer: &'static str,
    pub not_medical_advice: &'static str,
    pub brand_names: &'static str,
    pub boxed_warning: &'static str,
    pub quick_warnings: &'static str,
    pub mechanism: &'static str,
    pub indications: &'static str,
    pub dosing_adult: &'static str,
    pub dosing_pediatric: &'static str,
    pub contraindications: &'static str,
    pub warnings: &'static str,
    pub adverse_effects: &'static str,
    pub common: &'static str,
    pub serious: &'static str,
    pub interactions: &'static str,
    pub severe: &'static str,
    pub moderate: &'static str,
    pub minor: &'static str,
    pub pregnancy: &'static str,
    pub renal_hepatic: &'static str,
    pub alternatives: &'static str,
    pub generic_equivalents: &'static str,
    pub therapeutic_alternatives: &'static str,
    pub references: &'static str,
    pub availability: &'static str,
}

const EN: UiTexts = UiTexts {
    title: "Sehatna Drug Guide",
    search_placeholder: "Enter a drug name (e.g. Paracetamol)",
    search_button: "Search",
    loading: "Fetching drug information...",
    error: "Sorry, we could not retrieve information for this drug. Please try again.",
    initial_message: "Search for a medication to see its details.",
    disclaimer: "This information is for educational purposes only and is not a substitute for professional medical advice. Always consult your doctor or pharmacist.",
    not_medical_advice: "Not medical advice",
    brand_names: "Brand names",
    boxed_warning: "Boxed Warning",
    quick_warnings: "Quick Warnings",
    mechanism: "Mechanism of Action",
    indications: "Indications",
    dosing_adult: "Adult Dosing",
    dosing_pediatric: "Pediatric Dosing",
    contraindications: "Contraindications",
    warnings: "Warnings & Precautions",
    adverse_effects: "Adverse Effects",
    common: "Common",
    serious: "Serious",
    interactions: "Drug Interactions",
    severe: "Severe",
    moderate: "Moderate",
    minor: "Minor",
    pregnancy: "Pregnancy & Lactation",
    renal_hepatic: "Renal & Hepatic Adjustment",
    alternatives: "Alternatives",
    generic_equivalents: "Generic equivalents",
    therapeutic_alternatives: "Therapeutic alternatives",
    references: "References",
    availability: "Availability",
};

const AR: UiTexts = UiTexts {
    title: "دليل صحتنا للأدوية",
    search_placeholder: "أدخل اسم الدواء (مثال: باراسيتامول)",
    search_button: "بحث",
    loading: "جاري جلب معلومات الدواء...",
    error: "عذراً، تعذر جلب معلومات هذا الدواء. يرجى المحاولة مرة أخرى.",
    initial_message: "ابحث عن دواء لعرض تفاصيله.",
    disclaimer: "هذه المعلومات لأغراض تعليمية فقط ولا تغني عن الاستشارة الطبية المتخصصة. استشر طبيبك أو الصيدلي دائماً.",
    not_medical_advice: "ليست نصيحة طبية",
    brand_names: "الأسماء التجارية",
    boxed_warning: "تحذير مؤطر",
    quick_warnings: "تحذيرات سريعة",
    mechanism: "آلية العمل",
    indications: "دواعي الاستعمال",
    dosing_adult: "جرعات البالغين",
    dosing_pediatric: "جرعات الأطفال",
    contraindications: "موانع الاستعمال",
    warnings: "التحذيرات والاحتياطات",
    adverse_effects: "الآثار الجانبية",
    common: "شائعة",
    serious: "خطيرة",
    interactions: "التداخلات الدوائية",
    severe: "شديدة",
    moderate: "متوسطة",
    minor: "طفيفة",
    pregnancy: "الحمل والرضاعة",
    renal_hepatic: "تعديل الجرعة الكلوية والكبدية",
    alternatives: "البدائل",
    generic_equivalents: "المكافئات الجنيسة",
    therapeutic_alternatives: "البدائل العلاجية",
    references: "المراجع",
    availability: "طريقة الصرف",
};

/// Strings for `language`.
pub fn ui_texts(language: Language) -> &'static UiTexts {
    match language {
        Language::En => &EN,
        Language::Ar => &AR,
    }
}

/// Label shown on the language toggle: the name of the *other* language.
pub fn language_toggle_label(current: Language) -> &'static str {
    match current {
        Language::En => "العربية",
        Language::Ar => "English",
    }
}

/// One entry of the region picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    pub value: Region,
    pub label: &'static str,
}

/// The region picker, in display order.
pub fn region_options() -> Vec<RegionOption> {
    Region::ALL
        .iter()
        .map(|&value| RegionOption {
            value,
            label: region_label(value),
        })
        .collect()
}

pub fn region_label(region: Region) -> &'static str {
    match region {
        Region::Global => "Global (WHO)",
        Region::Us => "USA (FDA)",
        Region::Eu => "EU (EMA)",
        Region::Uk => "UK (NHS)",
        Region::Sa => "Saudi Arabia (SFDA)",
    }
}

/// Quick-pick queries offered under the search box.
pub fn example_drugs(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &["Paracetamol", "Ibuprofen", "Amoxicillin", "Metformin", "Atorvastatin"],
        Language::Ar => &["باراسيتامول", "إيبوبروفين", "أموكسيسيلين", "ميتفورمين", "أتورفاستاتين"],
    }
}

/// Everything the lookup screen needs to render its chrome in one language.
#[derive(Debug, Clone, Serialize)]
pub struct LookupOptions {
    pub language: Language,
    pub direction: &'static str,
    pub language_toggle: &'static str,
    pub texts: &'static UiTexts,
    pub regions: Vec<RegionOption>,
    pub default_region: Region,
    pub example_drugs: &'static [&'static str],
}

impl LookupOptions {
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            direction: language.direction(),
            language_toggle: language_toggle_label(language),
            texts: ui_texts(language),
            regions: region_options(),
            default_region: Region::Us,
            example_drugs: example_drugs(language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_nonempty_strings() {
        for &language in Language::ALL {
            let value = serde_json::to_value(ui_texts(language)).unwrap();
            let obj = value.as_object().unwrap();
            assert_eq!(obj.len(), 31);
            for (key, text) in obj {
                assert!(
                    !text.as_str().unwrap().trim().is_empty(),
                    "{language}: {key} is empty"
                );
            }
        }
    }

    #[test]
    fn languages_differ() {
        assert_ne!(ui_texts(Language::En).error, ui_texts(Language::Ar).error);
        assert_ne!(ui_texts(Language::En).title, ui_texts(Language::Ar).title);
    }

    #[test]
    fn region_picker_covers_all_regions() {
        let options = region_options();
        assert_eq!(options.len(), 5);
        assert_eq!(options[1].value, Region::Us);
        assert!(options.iter().all(|o| o.label.contains('(')));
    }

    #[test]
    fn options_follow_language() {
        let ar = LookupOptions::for_language(Language::Ar);
        assert_eq!(ar.direction, "rtl");
        assert_eq!(ar.language_toggle, "English");
        assert_eq!(ar.example_drugs[0], "باراسيتامول");

        let en = LookupOptions::for_language(Language::En);
        assert_eq!(en.direction, "ltr");
        assert_eq!(en.default_region, Region::Us);

        let json = serde_json::to_value(&en).unwrap();
        assert_eq!(json["texts"]["searchButton"], "Search");
        assert_eq!(json["regions"][0]["value"], "global");
    }
}
