// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Noise descriptor categories and record classification.
//!
//! Every complaint lands in exactly one of eighteen buckets. The first
//! seventeen are matched by substring against the record's descriptor, in
//! list order; [`NoiseCategory::Others`] is the catch-all.

use crate::style::Rgb;

/// A noise descriptor bucket. Declaration order is legend and color order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoiseCategory {
    AirConditionVentilation,
    Alarms,
    BangingPounding,
    BarkingDog,
    CarTruckHorn,
    CarTruckMusic,
    ConstructionEquipment,
    ConstructionBeforeAfterHours,
    EngineIdling,
    IceCreamTruck,
    JackHammering,
    LawnCareEquipment,
    LoudMusicParty,
    LoudTalking,
    LoudTelevision,
    ManufacturingNoise,
    PrivateCartingNoise,
    Others,
}

impl NoiseCategory {
    pub const COUNT: usize = 18;

    pub const ALL: [NoiseCategory; Self::COUNT] = [
        Self::AirConditionVentilation,
        Self::Alarms,
        Self::BangingPounding,
        Self::BarkingDog,
        Self::CarTruckHorn,
        Self::CarTruckMusic,
        Self::ConstructionEquipment,
        Self::ConstructionBeforeAfterHours,
        Self::EngineIdling,
        Self::IceCreamTruck,
        Self::JackHammering,
        Self::LawnCareEquipment,
        Self::LoudMusicParty,
        Self::LoudTalking,
        Self::LoudTelevision,
        Self::ManufacturingNoise,
        Self::PrivateCartingNoise,
        Self::Others,
    ];

    /// Descriptor label as it appears in 311 data.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AirConditionVentilation => "Air Condition/Ventilation Equipment",
            Self::Alarms => "Alarms",
            Self::BangingPounding => "Banging/Pounding",
            Self::BarkingDog => "Barking Dog",
            Self::CarTruckHorn => "Car/Truck Horn",
            Self::CarTruckMusic => "Car/Truck Music",
            Self::ConstructionEquipment => "Construction Equipment",
            Self::ConstructionBeforeAfterHours => "Construction Before/After Hours",
            Self::EngineIdling => "Engine Idling",
            Self::IceCreamTruck => "Ice Cream Truck",
            Self::JackHammering => "Jack Hammering",
            Self::LawnCareEquipment => "Lawn Care Equipment",
            Self::LoudMusicParty => "Loud Music/Party",
            Self::LoudTalking => "Loud Talking",
            Self::LoudTelevision => "Loud Television",
            Self::ManufacturingNoise => "Manufacturing Noise",
            Self::PrivateCartingNoise => "Private Carting Noise",
            Self::Others => "Others",
        }
    }

    /// Marker and legend color.
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            Self::AirConditionVentilation => Rgb::new(0x7f, 0x3b, 0x08),
            Self::Alarms => Rgb::new(0xa5, 0x00, 0x26),
            Self::BangingPounding => Rgb::new(0xd7, 0x30, 0x27),
            Self::BarkingDog => Rgb::new(0xf4, 0x6d, 0x43),
            Self::CarTruckHorn => Rgb::new(0xfd, 0xae, 0x61),
            Self::CarTruckMusic => Rgb::new(0xfe, 0xe0, 0x90),
            Self::ConstructionEquipment => Rgb::new(0xff, 0xff, 0xbf),
            Self::ConstructionBeforeAfterHours => Rgb::new(0xff, 0xff, 0xff),
            Self::EngineIdling => Rgb::new(0xe0, 0xf3, 0xf8),
            Self::IceCreamTruck => Rgb::new(0xab, 0xd9, 0xe9),
            Self::JackHammering => Rgb::new(0x74, 0xad, 0xd1),
            Self::LawnCareEquipment => Rgb::new(0x45, 0x75, 0xb4),
            Self::LoudMusicParty => Rgb::new(0x31, 0x36, 0x95),
            Self::LoudTalking => Rgb::new(0xd8, 0xda, 0xeb),
            Self::LoudTelevision => Rgb::new(0xb2, 0xab, 0xd2),
            Self::ManufacturingNoise => Rgb::new(0x80, 0x73, 0xac),
            Self::PrivateCartingNoise => Rgb::new(0x54, 0x27, 0x88),
            Self::Others => Rgb::new(0x00, 0x00, 0x00),
        }
    }

    /// Position in [`NoiseCategory::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Test applied to a record's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Descriptor contains the given text anywhere.
    Contains(&'static str),
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, descriptor: &str) -> bool {
        match self {
            Self::Contains(needle) => descriptor.contains(needle),
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub category: NoiseCategory,
}

/// How a descriptor was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matched the rule at this position.
    Rule {
        position: usize,
        category: NoiseCategory,
    },
    /// No rule matched.
    Fallback(NoiseCategory),
}

impl Classification {
    #[must_use]
    pub fn category(self) -> NoiseCategory {
        match self {
            Self::Rule { category, .. } | Self::Fallback(category) => category,
        }
    }
}

/// Ordered rules with a single fallback; first matching rule wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: NoiseCategory,
}

impl Classifier {
    #[must_use]
    pub fn new(rules: Vec<Rule>, fallback: NoiseCategory) -> Self {
        Self { rules, fallback }
    }

    /// Substring rules for every category except `Others`, which is the fallback.
    #[must_use]
    pub fn standard() -> Self {
        let rules = NoiseCategory::ALL
            .iter()
            .filter(|c| **c != NoiseCategory::Others)
            .map(|&category| Rule {
                predicate: Predicate::Contains(category.label()),
                category,
            })
            .collect();

        Self::new(rules, NoiseCategory::Others)
    }

    #[must_use]
    pub fn explain(&self, descriptor: &str) -> Classification {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.predicate.matches(descriptor))
            .map_or(Classification::Fallback(self.fallback), |(position, rule)| {
                Classification::Rule {
                    position,
                    category: rule.category,
                }
            })
    }

    #[must_use]
    pub fn classify(&self, descriptor: &str) -> NoiseCategory {
        self.explain(descriptor).category()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table_is_consistent() {
        assert_eq!(NoiseCategory::ALL.len(), NoiseCategory::COUNT);
        for (i, category) in NoiseCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(NoiseCategory::ALL[17], NoiseCategory::Others);
        assert_eq!(NoiseCategory::Alarms.color().to_string(), "#a50026");
        assert_eq!(NoiseCategory::LoudMusicParty.color().to_string(), "#313695");
        assert_eq!(NoiseCategory::Others.color().to_string(), "#000000");
    }

    #[test]
    fn test_every_label_classifies_to_itself() {
        let classifier = Classifier::standard();

        for (position, category) in NoiseCategory::ALL[..17].iter().enumerate() {
            let descriptor = format!("Noise: {} (NM1)", category.label());
            assert_eq!(classifier.classify(&descriptor), *category);
            // No rule exists for Others, so every label hits its own rule
            assert_eq!(
                classifier.explain(category.label()),
                Classification::Rule {
                    position,
                    category: *category
                }
            );
        }
    }

    #[test]
    fn test_substring_match() {
        let classifier = Classifier::standard();
        assert_eq!(
            classifier.classify("Loud Music/Party control panel"),
            NoiseCategory::LoudMusicParty
        );
        assert_eq!(
            classifier.classify("Noise, Barking Dog (NR5)"),
            NoiseCategory::BarkingDog
        );
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = Classifier::standard();
        // Contains both "Alarms" (2) and "Loud Talking" (14)
        let result = classifier.explain("Loud Talking near Alarms");
        assert_eq!(
            result,
            Classification::Rule {
                position: 1,
                category: NoiseCategory::Alarms
            }
        );
    }

    #[test]
    fn test_unmatched_falls_back_to_others() {
        let classifier = Classifier::standard();
        assert_eq!(
            classifier.explain("Noise: Boat(Engine,Music,Etc) (NR10)"),
            Classification::Fallback(NoiseCategory::Others)
        );
        assert_eq!(classifier.classify(""), NoiseCategory::Others);
        // Matching is case sensitive
        assert_eq!(classifier.classify("loud music/party"), NoiseCategory::Others);
    }

    #[test]
    fn test_others_label_still_falls_back() {
        let classifier = Classifier::standard();
        assert_eq!(
            classifier.explain("Others"),
            Classification::Fallback(NoiseCategory::Others)
        );
    }
}
