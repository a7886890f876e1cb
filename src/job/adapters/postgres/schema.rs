//! Diesel schema for job request persistence.

diesel::table! {
    /// Job requests placed by clients.
    job_requests (id) {
        /// Sequence-allocated job request identifier.
        id -> BigInt,
        /// Requesting client.
        client_id -> BigInt,
        /// Service-specific payload.
        service -> Jsonb,
        /// Scheduled local date.
        schedule_date -> Date,
        /// Scheduled local start time.
        start_time -> Time,
        /// Length of the job in hours.
        duration_hours -> SmallInt,
        /// Derived end instant, normalised to UTC.
        end_datetime -> Timestamptz,
        /// Requested number of freelancers.
        number_of_freelancers -> SmallInt,
        /// Decimal pay per hour, stored in canonical string form.
        pay_per_hour -> Text,
        /// ISO 4217 currency code of the pay rate.
        #[max_length = 3]
        currency -> Varchar,
        /// Whether the pay includes tips.
        tips_included -> Bool,
        /// Minimum years of experience.
        years_experience -> SmallInt,
        /// Smartphone requirement.
        #[max_length = 20]
        phone_requirement -> Varchar,
        /// First address line.
        #[max_length = 75]
        address_line1 -> Varchar,
        /// Optional second address line.
        #[max_length = 75]
        address_line2 -> Nullable<Varchar>,
        /// Postcode.
        #[max_length = 10]
        postcode -> Varchar,
        /// Free-text comments.
        comments -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Submission timestamp.
        submitted_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
