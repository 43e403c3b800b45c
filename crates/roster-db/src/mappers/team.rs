//! Team entity <-> model mapper

use roster_core::entities::Team;
use roster_core::value_objects::TeamId;

use crate::models::TeamModel;

impl From<TeamModel> for Team {
    fn from(model: TeamModel) -> Self {
        Team {
            id: Some(TeamId::new(model.team_id)),
            name: model.name,
        }
    }
}
