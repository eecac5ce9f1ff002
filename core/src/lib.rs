mod config;
mod error;
mod game;
mod time;

pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use game::{
    ActionOutcome, BASE_TAX_RATE, BudgetShares, Country, CountryEventKind, CountryEventRecord,
    CountryEvents, CountryId, CountrySnapshot, DiplomacySystem, DiplomaticAction,
    DiplomaticLogEntry, DiplomaticRelation, DiplomaticSummary, EconomicEvent, EconomyModel,
    EconomySnapshot, ElectionOutcome, GameState, GovernmentModel, GovernmentProfile,
    GovernmentSnapshot, GovernmentType, INITIAL_COUNTRIES, Ideology, MAX_COUNTRIES,
    MAX_POPULATION_GROWTH, MAX_TAX_RATE, MIN_COUNTRIES, MIN_TAX_RATE, NaturalResource,
    PoliticalEvent, PoliticalParty, PopulationEvent, PopulationModel, PopulationSnapshot,
    Position, RecentEvents, RelationStatus, RelationSummary, Satisfaction, SpendingShares,
    TimeStatus, Trait, World, WorldBuilder, WorldStats,
};
pub use time::{CalendarDate, GameClock};
