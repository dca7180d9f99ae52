// meteobot - Daily Discord weather bulletin with clothing advice
//
// Copyright 2025 The meteobot authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Clothing advice derived from a temperature and a weather description.
//!
//! Selection happens in two layers, both driven by tables evaluated in
//! declared order:
//!
//! 1. The temperature resolves to a band (`TEMPERATURE_BANDS`) which sets the
//!    baseline emoji and advice.
//! 2. The description, lowercased, is scanned against the keyword categories
//!    (`KEYWORD_RULES`). The first matching category overrides the baseline:
//!    what falls from the sky matters more than how warm it is.
//!
//! The function is total: any float (finite or not) and any string produce an
//! advice. Unrecognized descriptions fall back to the temperature band, and
//! temperatures that compare with nothing (NaN) resolve to the mild band.

/// Emoji and clothing advice for one weather reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceResult {
    pub emoji: &'static str,
    pub advice: &'static str,
}

/// One keyword category: any keyword hit selects this category's advice.
///
/// Categories are matched in the order they are declared, so `pluie` beats
/// `neige` if a description somehow mentions both.
struct KeywordRule {
    keywords: &'static [&'static str],
    emoji: &'static str,
    advice: &'static str,
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["pluie"],
        emoji: "🌧️",
        advice: "Prends un imperméable et un parapluie ☔.",
    },
    KeywordRule {
        keywords: &["averse", "bruine"],
        emoji: "🌦️",
        advice: "Un K-way ou une capuche suffira pour rester au sec.",
    },
    KeywordRule {
        keywords: &["neige"],
        emoji: "❄️",
        advice: "Mets un manteau chaud, bonnet, gants et écharpe 🧤🧣.",
    },
    KeywordRule {
        keywords: &["verglas"],
        emoji: "🧊",
        advice: "Chaussures à bonne adhérence et tenue bien chaude.",
    },
    KeywordRule {
        keywords: &["nuageux", "couvert"],
        emoji: "☁️",
        advice: "Un pull ou une veste légère sera parfait.",
    },
    KeywordRule {
        keywords: &["brume", "brouillard"],
        emoji: "🌫️",
        advice: "Prends une petite veste pour l'humidité.",
    },
    KeywordRule {
        keywords: &["vent"],
        emoji: "💨",
        advice: "Mets une veste coupe-vent.",
    },
    KeywordRule {
        keywords: &["soleil", "clair", "dégagé"],
        emoji: "☀️",
        advice: "Lunettes de soleil 🕶️ et vêtements légers.",
    },
];

/// One temperature band. `upper` is the exclusive upper bound in °C; bands
/// are scanned in ascending order and the first bound above the reading wins.
struct TemperatureBand {
    upper: f64,
    emoji: &'static str,
    advice: &'static str,
}

const TEMPERATURE_BANDS: &[TemperatureBand] = &[
    TemperatureBand {
        upper: 0.0,
        emoji: "🥶",
        advice: "Froid glacial : doudoune, bonnet, gants et écharpe obligatoires.",
    },
    TemperatureBand {
        upper: 5.0,
        emoji: "🥶",
        advice: "Manteau, bonnet et gants indispensables.",
    },
    TemperatureBand {
        upper: 10.0,
        emoji: "🧥",
        advice: "Manteau chaud ou grosse veste recommandés.",
    },
    TemperatureBand {
        upper: 18.0,
        emoji: "🧥",
        advice: "Une veste ou un pull épais feront l'affaire.",
    },
    TemperatureBand {
        upper: 25.0,
        emoji: "🌤️",
        advice: "Habille-toi confortablement, ni trop chaud ni trop froid.",
    },
];

/// Above `HOT_THRESHOLD` (exclusive) it is genuinely hot; between the last
/// band and the threshold it is merely warm.
const HOT_THRESHOLD: f64 = 30.0;

const BAND_WARM: AdviceResult = AdviceResult {
    emoji: "😎",
    advice: "T-shirt et vêtements légers, pense à t'hydrater.",
};

const BAND_HOT: AdviceResult = AdviceResult {
    emoji: "🥵",
    advice: "T-shirt, short et casquette 🧢.",
};

/// Neutral fallback, also the 18-25°C band: comfortable weather, no special
/// precaution.
const BAND_DEFAULT: AdviceResult = AdviceResult {
    emoji: "🌤️",
    advice: "Habille-toi confortablement, ni trop chaud ni trop froid.",
};

/// Resolve the temperature band for a reading in °C.
fn temperature_band(temperature_c: f64) -> AdviceResult {
    if temperature_c > HOT_THRESHOLD {
        return BAND_HOT;
    }

    for band in TEMPERATURE_BANDS {
        if temperature_c < band.upper {
            return AdviceResult {
                emoji: band.emoji,
                advice: band.advice,
            };
        }
    }

    if temperature_c <= HOT_THRESHOLD {
        return BAND_WARM;
    }

    // NaN compares with nothing and lands here
    BAND_DEFAULT
}

/// Pick the emoji and clothing advice for a reading.
///
/// The temperature band sets the baseline; a keyword match in the description
/// overrides it. Matching is case-insensitive, substring based, and happens
/// in the declared order of `KEYWORD_RULES`.
pub fn select_advice(temperature_c: f64, description: &str) -> AdviceResult {
    let baseline = temperature_band(temperature_c);
    let normalized = description.to_lowercase();

    for rule in KEYWORD_RULES {
        if rule.keywords.iter().any(|k| normalized.contains(k)) {
            return AdviceResult {
                emoji: rule.emoji,
                advice: rule.advice,
            };
        }
    }

    baseline
}

#[cfg(test)]
mod tests {
    use super::{select_advice, AdviceResult, BAND_DEFAULT, BAND_HOT, BAND_WARM};

    fn advice_at(temperature_c: f64) -> AdviceResult {
        select_advice(temperature_c, "conditions inconnues")
    }

    #[test]
    fn rain_keyword_beats_sub_zero_band() {
        let res = select_advice(-2.0, "pluie légère");
        assert_eq!(res.emoji, "🌧️");
        assert!(res.advice.contains("parapluie"));
        assert!(!res.advice.contains("doudoune"));
    }

    #[test]
    fn snow_advice_carries_cold_clothing() {
        let res = select_advice(-5.0, "neige");
        assert_eq!(res.emoji, "❄️");
        assert!(res.advice.contains("manteau chaud"));
        assert!(res.advice.contains("bonnet"));
    }

    #[test]
    fn clear_sky_is_sunny() {
        let res = select_advice(22.0, "ciel dégagé");
        assert_eq!(res.emoji, "☀️");
        assert!(res.advice.contains("légers"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(select_advice(22.0, "Ciel Dégagé").emoji, "☀️");
        assert_eq!(select_advice(3.0, "NEIGE").emoji, "❄️");
    }

    #[test]
    fn first_declared_category_wins() {
        // both rain and snow appear; rain is declared first
        let res = select_advice(0.0, "pluie et neige mêlées");
        assert_eq!(res.emoji, "🌧️");
    }

    #[test]
    fn drizzle_and_shower_share_a_category() {
        assert_eq!(select_advice(12.0, "bruine").emoji, "🌦️");
        assert_eq!(select_advice(12.0, "averses éparses").emoji, "🌦️");
    }

    #[test]
    fn overcast_fog_wind_and_ice_categories() {
        assert_eq!(select_advice(12.0, "ciel couvert").emoji, "☁️");
        assert_eq!(select_advice(12.0, "partiellement nuageux").emoji, "☁️");
        assert_eq!(select_advice(12.0, "brouillard givrant").emoji, "🌫️");
        assert_eq!(select_advice(12.0, "vent fort").emoji, "💨");
        assert_eq!(select_advice(-1.0, "verglas").emoji, "🧊");
    }

    #[test]
    fn band_edges_resolve_to_the_upper_band() {
        // each boundary belongs to the band it opens
        assert!(advice_at(-0.1).advice.contains("doudoune"));
        assert!(advice_at(0.0).advice.contains("indispensables"));
        assert!(advice_at(4.9).advice.contains("indispensables"));
        assert!(advice_at(5.0).advice.contains("grosse veste"));
        assert!(advice_at(9.9).advice.contains("grosse veste"));
        assert!(advice_at(10.0).advice.contains("pull épais"));
        assert!(advice_at(17.9).advice.contains("pull épais"));
        assert_eq!(advice_at(18.0), BAND_DEFAULT);
        assert_eq!(advice_at(24.9), BAND_DEFAULT);
        assert_eq!(advice_at(25.0), BAND_WARM);
    }

    #[test]
    fn thirty_degrees_is_warm_above_is_hot() {
        assert_eq!(advice_at(30.0), BAND_WARM);
        assert_eq!(advice_at(30.1), BAND_HOT);
        assert_eq!(advice_at(45.0), BAND_HOT);
    }

    #[test]
    fn total_over_odd_inputs() {
        assert_eq!(advice_at(f64::NAN), BAND_DEFAULT);
        assert_eq!(advice_at(f64::INFINITY), BAND_HOT);
        assert!(advice_at(f64::NEG_INFINITY).advice.contains("doudoune"));
        // empty description falls through to the band
        assert_eq!(select_advice(20.0, ""), BAND_DEFAULT);
    }

    #[test]
    fn deterministic() {
        assert_eq!(select_advice(7.3, "pluie modérée"), select_advice(7.3, "pluie modérée"));
    }
}
