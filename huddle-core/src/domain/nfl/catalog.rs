use uuid::Uuid;

use super::team::{Conference, Division, Team};

/// Static description of a franchise used to seed `nfl_teams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSeed {
    pub code: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub conference: Conference,
    pub division: Division,
    pub points: i32,
}

impl TeamSeed {
    pub fn to_team(&self) -> Team {
        Team {
            team_id: Uuid::now_v7(),
            team_code: self.code.to_string(),
            team_name: self.name.to_string(),
            team_city: self.city.to_string(),
            conference: self.conference,
            division: self.division,
            points: self.points,
            is_active: true,
        }
    }
}

macro_rules! team {
    ($code:literal, $name:literal, $city:literal, $conf:ident, $div:ident, $points:literal) => {
        TeamSeed {
            code: $code,
            name: $name,
            city: $city,
            conference: Conference::$conf,
            division: Division::$div,
            points: $points,
        }
    };
}

pub const NFL_TEAMS: [TeamSeed; 32] = [
    team!("BUF", "Bills", "Buffalo", Afc, East, 10),
    team!("MIA", "Dolphins", "Miami", Afc, East, 8),
    team!("NE", "Patriots", "New England", Afc, East, 6),
    team!("NYJ", "Jets", "New York", Afc, East, 4),
    team!("BAL", "Ravens", "Baltimore", Afc, North, 9),
    team!("CIN", "Bengals", "Cincinnati", Afc, North, 7),
    team!("CLE", "Browns", "Cleveland", Afc, North, 5),
    team!("PIT", "Steelers", "Pittsburgh", Afc, North, 10),
    team!("HOU", "Texans", "Houston", Afc, South, 7),
    team!("IND", "Colts", "Indianapolis", Afc, South, 6),
    team!("JAX", "Jaguars", "Jacksonville", Afc, South, 5),
    team!("TEN", "Titans", "Tennessee", Afc, South, 4),
    team!("DEN", "Broncos", "Denver", Afc, West, 6),
    team!("KC", "Chiefs", "Kansas City", Afc, West, 10),
    team!("LV", "Raiders", "Las Vegas", Afc, West, 5),
    team!("LAC", "Chargers", "Los Angeles", Afc, West, 8),
    team!("DAL", "Cowboys", "Dallas", Nfc, East, 9),
    team!("NYG", "Giants", "New York", Nfc, East, 5),
    team!("PHI", "Eagles", "Philadelphia", Nfc, East, 10),
    team!("WAS", "Commanders", "Washington", Nfc, East, 6),
    team!("CHI", "Bears", "Chicago", Nfc, North, 4),
    team!("DET", "Lions", "Detroit", Nfc, North, 9),
    team!("GB", "Packers", "Green Bay", Nfc, North, 8),
    team!("MIN", "Vikings", "Minnesota", Nfc, North, 7),
    team!("ATL", "Falcons", "Atlanta", Nfc, South, 6),
    team!("CAR", "Panthers", "Carolina", Nfc, South, 3),
    team!("NO", "Saints", "New Orleans", Nfc, South, 7),
    team!("TB", "Buccaneers", "Tampa Bay", Nfc, South, 8),
    team!("ARI", "Cardinals", "Arizona", Nfc, West, 5),
    team!("LAR", "Rams", "Los Angeles", Nfc, West, 7),
    team!("SF", "49ers", "San Francisco", Nfc, West, 10),
    team!("SEA", "Seahawks", "Seattle", Nfc, West, 6),
];

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    #[test]
    fn catalog_has_unique_codes() {
        let codes: HashSet<_> = NFL_TEAMS.iter().map(|t| t.code).collect();
        assert_eq!(codes.len(), 32);
    }

    #[test]
    fn every_division_has_four_teams() {
        let mut counts: HashMap<(Conference, Division), usize> = HashMap::new();
        for seed in &NFL_TEAMS {
            *counts.entry((seed.conference, seed.division)).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|count| *count == 4));
    }
}
