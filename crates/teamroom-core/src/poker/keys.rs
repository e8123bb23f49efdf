//! Storage key layout shared with the browser widget.

use super::room::RoomId;
use super::vote::UserName;

/// Last-used display name.
pub const USERNAME_KEY: &str = "planning-poker-username";

/// `planning-poker-{room}-{user}`
pub fn vote_key(room: &RoomId, user: &UserName) -> String {
    format!("{}{user}", vote_prefix(room))
}

/// `planning-poker-{room}-`, the prefix of every vote in the room.
pub fn vote_prefix(room: &RoomId) -> String {
    format!("planning-poker-{room}-")
}

/// `planning-poker-users-{room}`
pub fn users_key(room: &RoomId) -> String {
    format!("planning-poker-users-{room}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let room = RoomId::new("abc").unwrap();
        let user = UserName::new("Ann Lee").unwrap();
        assert_eq!(vote_key(&room, &user), "planning-poker-abc-Ann Lee");
        assert_eq!(users_key(&room), "planning-poker-users-abc");
        assert!(vote_key(&room, &user).starts_with(&vote_prefix(&room)));
    }

    #[test]
    fn other_keys_never_fall_under_a_vote_prefix() {
        let room = RoomId::new("user").unwrap();
        let prefix = vote_prefix(&room);
        assert!(!USERNAME_KEY.starts_with(&prefix));
        assert!(!users_key(&RoomId::new("x").unwrap()).starts_with(&prefix));

        let short = vote_prefix(&RoomId::new("ab").unwrap());
        let long_room_vote = vote_key(&RoomId::new("abc").unwrap(), &UserName::new("z").unwrap());
        assert!(!long_room_vote.starts_with(&short));
    }
}
