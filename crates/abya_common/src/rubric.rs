//! Fixed rubric tables: course clusters, evaluation elements, weights.
//!
//! These mirror the published ABYA University course rubric. They are
//! process-wide constants; nothing here changes at runtime.

use std::fmt;

/// Minimum weighted score for a passing verdict.
pub const PASS_MARK: u32 = 80;

/// The five course clusters a course can be evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BlockchainTechnology,
    Web3Development,
    BlockchainBusiness,
    Web3Ecosystem,
    EmergingTechnologies,
}

/// The ten evaluation elements, in canonical rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    LearnerAgency,
    CriticalThinking,
    CollaborativeLearning,
    ReflectivePractice,
    AdaptiveLearning,
    AuthenticLearning,
    TechnologyIntegration,
    LearnerSupport,
    AssessmentForLearning,
    EngagementAndMotivation,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BlockchainTechnology,
        Category::Web3Development,
        Category::BlockchainBusiness,
        Category::Web3Ecosystem,
        Category::EmergingTechnologies,
    ];

    /// Full rubric name, as it appears in pipeline payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Category::BlockchainTechnology => "Blockchain Technology and Development",
            Category::Web3Development => "Web3 Development and Design",
            Category::BlockchainBusiness => "Blockchain Applications and Business",
            Category::Web3Ecosystem => "Web3 Ecosystem and Operations",
            Category::EmergingTechnologies => "Emerging Technologies and Intersections",
        }
    }

    /// Resolve a category from its full name. Surrounding whitespace is
    /// ignored; anything else must match exactly.
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Weight table for this category, in canonical element order.
    /// Each table sums to 100.
    pub fn weights(&self) -> &'static [(Element, u32); 10] {
        match self {
            Category::BlockchainTechnology => &BLOCKCHAIN_TECHNOLOGY_WEIGHTS,
            Category::Web3Development => &WEB3_DEVELOPMENT_WEIGHTS,
            Category::BlockchainBusiness => &BLOCKCHAIN_BUSINESS_WEIGHTS,
            Category::Web3Ecosystem => &WEB3_ECOSYSTEM_WEIGHTS,
            Category::EmergingTechnologies => &EMERGING_TECHNOLOGIES_WEIGHTS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Element {
    pub const ALL: [Element; 10] = [
        Element::LearnerAgency,
        Element::CriticalThinking,
        Element::CollaborativeLearning,
        Element::ReflectivePractice,
        Element::AdaptiveLearning,
        Element::AuthenticLearning,
        Element::TechnologyIntegration,
        Element::LearnerSupport,
        Element::AssessmentForLearning,
        Element::EngagementAndMotivation,
    ];

    /// Full rubric name, as it appears in score maps.
    pub fn name(&self) -> &'static str {
        match self {
            Element::LearnerAgency => "Learner Agency",
            Element::CriticalThinking => "Critical Thinking",
            Element::CollaborativeLearning => "Collaborative Learning",
            Element::ReflectivePractice => "Reflective Practice",
            Element::AdaptiveLearning => "Adaptive Learning",
            Element::AuthenticLearning => "Authentic Learning",
            Element::TechnologyIntegration => "Technology Integration",
            Element::LearnerSupport => "Learner Support",
            Element::AssessmentForLearning => "Assessment for Learning",
            Element::EngagementAndMotivation => "Engagement and Motivation",
        }
    }

    /// Resolve an element from its full name (exact match).
    pub fn from_name(name: &str) -> Option<Element> {
        Element::ALL.iter().copied().find(|e| e.name() == name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const BLOCKCHAIN_TECHNOLOGY_WEIGHTS: [(Element, u32); 10] = [
    (Element::LearnerAgency, 10),
    (Element::CriticalThinking, 19),
    (Element::CollaborativeLearning, 10),
    (Element::ReflectivePractice, 5),
    (Element::AdaptiveLearning, 9),
    (Element::AuthenticLearning, 14),
    (Element::TechnologyIntegration, 19),
    (Element::LearnerSupport, 5),
    (Element::AssessmentForLearning, 5),
    (Element::EngagementAndMotivation, 4),
];

const WEB3_DEVELOPMENT_WEIGHTS: [(Element, u32); 10] = [
    (Element::LearnerAgency, 15),
    (Element::CriticalThinking, 15),
    (Element::CollaborativeLearning, 15),
    (Element::ReflectivePractice, 10),
    (Element::AdaptiveLearning, 10),
    (Element::AuthenticLearning, 10),
    (Element::TechnologyIntegration, 10),
    (Element::LearnerSupport, 5),
    (Element::AssessmentForLearning, 5),
    (Element::EngagementAndMotivation, 5),
];

const BLOCKCHAIN_BUSINESS_WEIGHTS: [(Element, u32); 10] = [
    (Element::LearnerAgency, 10),
    (Element::CriticalThinking, 20),
    (Element::CollaborativeLearning, 15),
    (Element::ReflectivePractice, 10),
    (Element::AdaptiveLearning, 10),
    (Element::AuthenticLearning, 15),
    (Element::TechnologyIntegration, 5),
    (Element::LearnerSupport, 5),
    (Element::AssessmentForLearning, 5),
    (Element::EngagementAndMotivation, 5),
];

const WEB3_ECOSYSTEM_WEIGHTS: [(Element, u32); 10] = [
    (Element::LearnerAgency, 16),
    (Element::CriticalThinking, 16),
    (Element::CollaborativeLearning, 16),
    (Element::ReflectivePractice, 10),
    (Element::AdaptiveLearning, 11),
    (Element::AuthenticLearning, 10),
    (Element::TechnologyIntegration, 5),
    (Element::LearnerSupport, 5),
    (Element::AssessmentForLearning, 5),
    (Element::EngagementAndMotivation, 6),
];

const EMERGING_TECHNOLOGIES_WEIGHTS: [(Element, u32); 10] = [
    (Element::LearnerAgency, 14),
    (Element::CriticalThinking, 19),
    (Element::CollaborativeLearning, 14),
    (Element::ReflectivePractice, 10),
    (Element::AdaptiveLearning, 10),
    (Element::AuthenticLearning, 14),
    (Element::TechnologyIntegration, 5),
    (Element::LearnerSupport, 5),
    (Element::AssessmentForLearning, 4),
    (Element::EngagementAndMotivation, 5),
];
