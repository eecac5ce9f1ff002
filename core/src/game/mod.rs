mod bootstrap;
mod constants;
pub(crate) use constants::*;
pub use constants::{
    BASE_TAX_RATE, INITIAL_COUNTRIES, MAX_COUNTRIES, MAX_POPULATION_GROWTH, MAX_TAX_RATE,
    MIN_COUNTRIES, MIN_TAX_RATE,
};
mod country;
mod diplomacy;
mod economy;
mod government;
mod population;
mod snapshot;
mod state;
pub(crate) mod systems;
mod time;
mod world;

pub use bootstrap::WorldBuilder;
pub use country::{
    Country, CountryEventKind, CountryEventRecord, CountryId, NaturalResource, Position, Trait,
};
pub use diplomacy::{
    ActionOutcome, DiplomacySystem, DiplomaticAction, DiplomaticLogEntry, DiplomaticRelation,
    RelationStatus,
};
pub use economy::{BudgetShares, EconomicEvent, EconomyModel, SpendingShares};
pub use government::{
    ElectionOutcome, GovernmentModel, GovernmentProfile, GovernmentType, Ideology, PoliticalEvent,
    PoliticalParty,
};
pub use population::{PopulationEvent, PopulationModel, Satisfaction};
pub use snapshot::{
    CountryEvents, CountrySnapshot, DiplomaticSummary, EconomySnapshot, GovernmentSnapshot,
    PopulationSnapshot, RecentEvents, RelationSummary, TimeStatus, WorldStats,
};
pub use state::GameState;
pub use world::World;
