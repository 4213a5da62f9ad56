//! Ball roster bookkeeping: activation and aggressor tags
//!
//! Operations apply immediately. Single indices are not validated beyond
//! slice bounds; an out-of-range index is a caller bug and panics.

use std::ops::Range;

use super::ball::BallRef;
use super::world::World;

/// Which balls a roster operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallScope {
    /// One ball by index
    Ball(usize),
    /// The ball being played
    Current,
    /// Balls of the active party (indices `1..=party`)
    Party,
    /// Every playable ball (index 0 excluded)
    All,
}

impl BallScope {
    /// Roster indices covered by this scope
    pub fn indices(self, current: usize, party: usize, count: usize) -> Range<usize> {
        match self {
            BallScope::Ball(i) => i..i + 1,
            BallScope::Current => current..current + 1,
            BallScope::Party => 1..(party + 1).min(count).max(1),
            BallScope::All => 1..count.max(1),
        }
    }
}

impl From<BallRef> for BallScope {
    fn from(r: BallRef) -> Self {
        match r {
            BallRef::Current => BallScope::Current,
            BallRef::Index(i) => BallScope::Ball(i),
        }
    }
}

/// Mutable view over a world's balls with the session's current ball and party size
pub struct Roster<'a> {
    world: &'a mut World,
    current: usize,
    party: usize,
}

impl<'a> Roster<'a> {
    pub fn new(world: &'a mut World, current: usize, party: usize) -> Self {
        Self {
            world,
            current,
            party,
        }
    }

    fn indices(&self, scope: BallScope) -> Range<usize> {
        scope.indices(self.current, self.party, self.world.balls.len())
    }

    pub fn activate(&mut self, scope: BallScope) {
        self.set_active(scope, true);
    }

    pub fn inactivate(&mut self, scope: BallScope) {
        self.set_active(scope, false);
    }

    fn set_active(&mut self, scope: BallScope, active: bool) {
        for i in self.indices(scope) {
            self.world.balls[i].active = active;
        }
    }

    pub fn aggressor(&self, ball: BallRef) -> Option<u32> {
        self.world.balls[ball.resolve(self.current)].aggressor
    }

    pub fn set_aggressor(&mut self, scope: BallScope, player: Option<u32>) {
        for i in self.indices(scope) {
            self.world.balls[i].aggressor = player;
        }
    }
}
