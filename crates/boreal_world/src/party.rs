//! The player party roster.

use boreal_foundation::{Error, ObjectId, Result};

/// The ordered party: member handles plus the current leader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    members: Vec<ObjectId>,
    leader: Option<ObjectId>,
}

impl Party {
    /// Creates an empty party.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Members in join order.
    #[must_use]
    pub fn members(&self) -> &[ObjectId] {
        &self.members
    }

    /// The current leader, if any.
    #[must_use]
    pub fn leader(&self) -> Option<ObjectId> {
        self.leader
    }

    /// Whether `id` is in the party.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    /// Adds a member at the end of the roster. The first member becomes
    /// leader. Adding an existing member is a no-op.
    pub fn add_member(&mut self, id: ObjectId) {
        if !self.contains(id) {
            self.members.push(id);
            if self.leader.is_none() {
                self.leader = Some(id);
            }
        }
    }

    /// Removes a member. Leadership falls to the earliest remaining member.
    pub fn remove_member(&mut self, id: ObjectId) {
        self.members.retain(|&member| member != id);
        if self.leader == Some(id) {
            self.leader = self.members.first().copied();
        }
    }

    /// Makes an existing member the leader.
    ///
    /// # Errors
    ///
    /// Returns `Argument` when `id` is not in the party.
    pub fn set_leader(&mut self, id: ObjectId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::argument(format!("{id} is not a party member")));
        }
        self.leader = Some(id);
        Ok(())
    }

    /// Empties the roster.
    pub fn clear(&mut self) {
        self.members.clear();
        self.leader = None;
    }
}
