use dashmap::{DashMap, DashSet};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::SchedulingConfig;
use crate::engine::ranking::{RankingDelegate, RuleScorer};
use crate::models::assignment::{Assignment, Notification};
use crate::models::availability::AvailabilityOverride;
use crate::models::event::Event;
use crate::models::rating::Rating;
use crate::models::rule::AssignmentRule;
use crate::models::staff::StaffMember;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub staff: DashMap<Uuid, StaffMember>,
    pub events: DashMap<Uuid, Event>,
    pub assignments: DashMap<Uuid, Assignment>,
    /// (event, staff) pairs currently holding an assignment. The insert is
    /// atomic, so concurrent coordinators cannot double-book a slot through
    /// the API even though the assignment write itself performs no dedup.
    pub assignment_slots: DashSet<(Uuid, Uuid)>,
    pub overrides: DashMap<Uuid, AvailabilityOverride>,
    pub ratings: DashMap<Uuid, Rating>,
    pub rules: DashMap<Uuid, AssignmentRule>,
    pub notifications: DashMap<Uuid, Notification>,
    pub notification_events_tx: broadcast::Sender<Notification>,
    pub ranker: Box<dyn RankingDelegate>,
    pub scheduling: SchedulingConfig,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(scheduling: SchedulingConfig, event_buffer_size: usize) -> Self {
        let (notification_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            staff: DashMap::new(),
            events: DashMap::new(),
            assignments: DashMap::new(),
            assignment_slots: DashSet::new(),
            overrides: DashMap::new(),
            ratings: DashMap::new(),
            rules: DashMap::new(),
            notifications: DashMap::new(),
            notification_events_tx,
            ranker: Box::new(RuleScorer::new()),
            scheduling,
            metrics: Metrics::new(),
        }
    }

    pub fn with_ranker(mut self, ranker: Box<dyn RankingDelegate>) -> Self {
        self.ranker = ranker;
        self
    }
}
