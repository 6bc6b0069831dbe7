diesel::table! {
    appointments (id) {
        id -> Int8,
        date_time -> Timestamptz,
        customer_name -> Varchar,
        customer_phone -> Varchar,
        slot_label -> Varchar,
        notes -> Nullable<Varchar>,
    }
}
