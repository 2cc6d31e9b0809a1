//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Task lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed links from an owning task to its children.
    task_children (parent_id, child_id) {
        /// Owning task identifier.
        parent_id -> Uuid,
        /// Linked child task identifier.
        child_id -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_children);
