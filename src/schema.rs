table! {
    attendances (gamer_id, event_id) {
        gamer_id -> Int8,
        event_id -> Int8,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    events (id) {
        id -> Int8,
        game_id -> Int8,
        organizer_id -> Int8,
        description -> Varchar,
        date -> Date,
        time -> Time,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    game_types (id) {
        id -> Int8,
        label -> Varchar,
    }
}

table! {
    games (id) {
        id -> Int8,
        game_type_id -> Int8,
        gamer_id -> Int8,
        title -> Varchar,
        maker -> Varchar,
        number_of_players -> Int4,
        skill_level -> Int4,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    gamers (id) {
        id -> Int8,
        user_id -> Int8,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        password -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        is_admin -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

joinable!(attendances -> events (event_id));
joinable!(attendances -> gamers (gamer_id));
joinable!(events -> games (game_id));
joinable!(events -> gamers (organizer_id));
joinable!(games -> game_types (game_type_id));
joinable!(games -> gamers (gamer_id));
joinable!(gamers -> users (user_id));

allow_tables_to_appear_in_same_query!(
    attendances,
    events,
    game_types,
    games,
    gamers,
    users,
);
