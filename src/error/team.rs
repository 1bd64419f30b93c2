use thiserror::Error;

/// Domain errors from the team membership and invitation subsystem.
///
/// Every variant carries a message suitable for rendering directly to the
/// player who issued the command. Variants group into the usual families:
/// missing entities (`TeamNotFound`, `InviteNotFound`, `NotOnTeam`,
/// `NotAMember`), conflicts (`AlreadyOnTeam`, `NameTaken`, `TeamFull`,
/// `InvitePending`, `AlreadyResolved`), permission failures (`NotLeader`,
/// `NotYourInvite`), bad arguments (`InvalidName`, `SelfTarget`) and expiry
/// (`InviteExpired`).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamError {
    /// The referenced team no longer exists.
    #[error("That team no longer exists.")]
    TeamNotFound,

    /// The referenced invitation id is unknown.
    #[error("That invite doesn't exist.")]
    InviteNotFound,

    /// The caller is not on any team.
    #[error("You are not on a team.")]
    NotOnTeam,

    /// The target player is not a member of the caller's team.
    #[error("That player is not on your team.")]
    NotAMember,

    /// The player already belongs to a team. Applies both to a caller
    /// creating a second team and to an invite target who joined another
    /// team in the meantime.
    #[error("Already on a team. Leave the current team first.")]
    AlreadyOnTeam,

    /// Another currently-existing team uses this name, compared
    /// case-insensitively.
    #[error("That team name is already taken.")]
    NameTaken,

    /// The team is at its configured member capacity.
    #[error("That team is full.")]
    TeamFull,

    /// An unexpired pending invitation for this player and team already
    /// exists.
    #[error("That player already has a pending invite to your team.")]
    InvitePending,

    /// The invitation was already accepted, denied, or expired. Responding
    /// again never mutates state.
    #[error("That invite has already been resolved.")]
    AlreadyResolved,

    /// The invitation's TTL passed before the response arrived.
    #[error("That invite has expired.")]
    InviteExpired,

    /// A leader-only operation was attempted by a non-leader.
    #[error("Only the team leader can do that.")]
    NotLeader,

    /// The responder is not the player the invitation was addressed to.
    #[error("That invite is not addressed to you.")]
    NotYourInvite,

    /// Team name outside the 2-20 character range.
    #[error("Team names must be between 2 and 20 characters.")]
    InvalidName,

    /// The caller targeted themselves with an operation that requires
    /// another member.
    #[error("You can't target yourself with that.")]
    SelfTarget,
}
