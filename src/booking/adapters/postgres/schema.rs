//! Diesel schema for invitation and booking persistence.

diesel::table! {
    /// Invitations offered to freelancers.
    invitations (id) {
        /// Invitation identifier.
        id -> Uuid,
        /// Job request the invitation is for.
        job_request_id -> BigInt,
        /// Invited freelancer.
        freelancer_id -> BigInt,
        /// Invitation status code.
        #[max_length = 10]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Answer timestamp.
        resolved_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Freelancers booked onto job requests.
    bookings (id) {
        /// Booking identifier.
        id -> Uuid,
        /// Job request the booking is for.
        job_request_id -> BigInt,
        /// Booked freelancer.
        freelancer_id -> BigInt,
        /// Accepted invitation, absent for direct bookings.
        invitation_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
