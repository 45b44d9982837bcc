use serde::Serialize;

/// A canonical activity and the variables that matter for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub name: &'static str,
    pub parameters: &'static [&'static str],
}

impl Activity {
    /// Alias names that resolve to this activity.
    pub fn aliases(&self) -> impl Iterator<Item = &'static str> + '_ {
        ACTIVITY_ALIASES
            .iter()
            .filter(move |(_, target)| *target == self.name)
            .map(|(alias, _)| *alias)
    }
}

const ACTIVITIES: &[Activity] = &[
    // Outdoor recreation
    Activity {
        name: "camping",
        parameters: &[
            "T2M",
            "T2M_MAX",
            "T2M_MIN",
            "RH2M",
            "PRECTOTCORR",
            "ALLSKY_KT",
            "WS2M",
        ],
    },
    Activity {
        name: "beach",
        parameters: &["T2M_MAX", "ALLSKY_SFC_SW_DWN", "ALLSKY_KT", "WS2M", "RH2M"],
    },
    Activity {
        name: "running",
        parameters: &["T2M", "T2M_MAX", "RH2M", "WS2M", "PRECTOTCORR"],
    },
    // Water
    Activity {
        name: "boating",
        parameters: &["PRECTOTCORR", "WS10M", "WD10M", "T2M", "RH2M", "ALLSKY_KT"],
    },
    // Observation
    Activity {
        name: "photography",
        parameters: &["ALLSKY_KT", "ALLSKY_SFC_SW_DWN", "T2M", "RH2M", "PRECTOTCORR"],
    },
    // Environmental and occupational
    Activity {
        name: "agriculture",
        parameters: &[
            "PRECTOTCORR",
            "T2M",
            "RH2M",
            "ALLSKY_SFC_SW_DWN",
            "EVLAND",
            "GWETROOT",
        ],
    },
    Activity {
        name: "aviation",
        parameters: &["WS10M", "WD10M", "PRECTOTCORR", "ALLSKY_KT", "T2M"],
    },
    // Events
    Activity {
        name: "outdoor_wedding",
        parameters: &[
            "PRECTOTCORR",
            "ALLSKY_KT",
            "ALLSKY_SFC_SW_DWN",
            "T2M_MAX",
            "RH2M",
            "WS2M",
        ],
    },
];

/// `(alias, canonical activity)` pairs. Targets are always canonical names.
pub const ACTIVITY_ALIASES: &[(&str, &str)] = &[
    ("hiking", "camping"),
    ("fishing", "boating"),
    ("sailing", "boating"),
    ("stargazing", "photography"),
    ("gardening", "agriculture"),
    ("drone", "aviation"),
    ("wedding", "outdoor_wedding"),
    ("party", "outdoor_wedding"),
    ("reception", "outdoor_wedding"),
];

/// All canonical activities in catalog order.
pub fn activities() -> &'static [Activity] {
    ACTIVITIES
}

/// Resolves a user-supplied name (canonical or alias) to its canonical activity.
pub fn canonical_activity(name: &str) -> Option<&'static Activity> {
    let key = name.trim().to_lowercase();
    let key = ACTIVITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, target)| *target)
        .unwrap_or(key.as_str());
    ACTIVITIES.iter().find(|activity| activity.name == key)
}

/// The variable codes for an activity (aliases allowed), or `None` if it is unknown.
///
/// # Examples
///
/// ```
/// use will_it_rain::parameters_for;
///
/// assert_eq!(parameters_for("Hiking"), parameters_for("camping"));
/// assert!(parameters_for("skydiving").is_none());
/// ```
pub fn parameters_for(activity: &str) -> Option<&'static [&'static str]> {
    canonical_activity(activity).map(|activity| activity.parameters)
}
