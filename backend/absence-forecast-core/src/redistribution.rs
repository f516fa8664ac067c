// src/redistribution.rs
use serde::{Deserialize, Serialize};

use crate::alerts::PredictiveAlert;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRedistribution {
    pub source_team: String,
    pub target_team: String,
    pub employee_names: Vec<String>,
    pub reason: String,
    pub impact: Impact,
}

fn redistribution(source: &str, target: &str, employees: &[&str], reason: &str, impact: Impact) -> TeamRedistribution {
    TeamRedistribution {
        source_team: source.to_string(),
        target_team: target.to_string(),
        employee_names: employees.iter().map(|e| e.to_string()).collect(),
        reason: reason.to_string(),
        impact,
    }
}

// Illustrative table only; it does not look at the alert's week or the roster.
pub fn generate_redistributions(alert: &PredictiveAlert) -> Vec<TeamRedistribution> {
    if !alert.risk_level.is_high_or_critical() {
        return Vec::new();
    }

    vec![
        redistribution(
            "Équipe Support",
            "Équipe Développement",
            &["Marie Martin", "Pierre Durand"],
            "Renforcement temporaire pour maintenir la productivité",
            Impact::Medium,
        ),
        redistribution(
            "Équipe Marketing",
            "Équipe Développement",
            &["Sophie Leroy"],
            "Compétences transversales disponibles",
            Impact::Low,
        ),
    ]
}

#[cfg(test)]
mod redistribution_tests {
    use super::*;
    use crate::risk_assessment::RiskLevel;
    use chrono::NaiveDate;

    fn alert_with_level(risk_level: RiskLevel) -> PredictiveAlert {
        PredictiveAlert {
            id: "alert-week-30".to_string(),
            week_number: 30,
            risk_level,
            expected_absences: 12,
            available_staff: 20,
            total_staff: 32,
            staff_deficit: false,
            staffing_percent: Some(63),
            message: String::new(),
            suggestions: vec![],
            week_start_date: NaiveDate::from_ymd_opt(2025, 7, 27).unwrap(),
        }
    }

    #[test]
    fn medium_alert_gets_no_redistribution() {
        assert!(generate_redistributions(&alert_with_level(RiskLevel::Medium)).is_empty());
        assert!(generate_redistributions(&alert_with_level(RiskLevel::Low)).is_empty());
    }

    #[test]
    fn high_alert_gets_support_and_marketing_moves() {
        let moves = generate_redistributions(&alert_with_level(RiskLevel::High));
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].source_team, "Équipe Support");
        assert_eq!(moves[0].target_team, "Équipe Développement");
        assert_eq!(moves[0].employee_names, vec!["Marie Martin", "Pierre Durand"]);
        assert_eq!(moves[0].impact, Impact::Medium);
        assert_eq!(moves[1].source_team, "Équipe Marketing");
        assert_eq!(moves[1].employee_names, vec!["Sophie Leroy"]);
        assert_eq!(moves[1].impact, Impact::Low);
    }

    #[test]
    fn critical_matches_high() {
        assert_eq!(
            generate_redistributions(&alert_with_level(RiskLevel::Critical)),
            generate_redistributions(&alert_with_level(RiskLevel::High))
        );
    }
}
