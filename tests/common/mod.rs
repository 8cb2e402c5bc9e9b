//! Hotel fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use graphql_query_args::{
    ArgumentList, ArgumentListBuilder, GraphObject, QueryArgsConfig, RequestArguments, TypeRegistry,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct RoomDetail {
    pub id: i32,
    pub windows: i32,
    pub beds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub number: i32,
    pub allowed_smoking: bool,
    #[graph(enumeration = "RoomStatus")]
    pub status: RoomStatus,
    pub room_detail: RoomDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct Building {
    pub rooms: Option<Vec<Room>>,
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct Guest {
    pub id: i32,
    pub name: String,
    pub register_date: NaiveDateTime,
    pub nullable_int: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct Extra {
    pub test: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, GraphObject)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    pub id: i32,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDateTime,
    pub guest: Option<Guest>,
    pub room: Option<Room>,
    pub extras: Vec<Extra>,
}

// ============================================================================
// Schema
// ============================================================================

pub fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry
        .register::<RoomDetail>()
        .register::<Room>()
        .register::<Building>()
        .register::<Guest>()
        .register::<Extra>()
        .register::<Reservation>();
    Arc::new(registry)
}

pub fn builder(config: QueryArgsConfig) -> ArgumentListBuilder {
    ArgumentListBuilder::new(registry()).with_config(config)
}

/// Arguments of `T` with order-by and paging support.
pub fn arguments<T: GraphObject>(config: QueryArgsConfig) -> ArgumentList {
    builder(config).build::<T>().support_order_by().support_paging()
}

pub fn values<const N: usize>(pairs: [(&str, async_graphql::Value); N]) -> RequestArguments {
    pairs.into_iter().collect()
}

// ============================================================================
// Data
// ============================================================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn room(id: i32, name: &str, number: i32) -> Room {
    Room {
        id,
        name: name.to_string(),
        number,
        allowed_smoking: id % 2 == 0,
        status: if id % 3 == 0 { RoomStatus::Unavailable } else { RoomStatus::Available },
        room_detail: RoomDetail {
            id,
            windows: 2,
            beds: 1 + id % 2,
        },
    }
}

pub fn guest(id: i32, name: &str, nullable_int: Option<i32>) -> Guest {
    Guest {
        id,
        name: name.to_string(),
        register_date: datetime(2019, 1, 1, 9),
        nullable_int,
    }
}

pub fn reservations() -> Vec<Reservation> {
    vec![
        Reservation {
            id: 1,
            checkin_date: date(2019, 2, 3),
            checkout_date: datetime(2019, 2, 5, 11),
            guest: Some(guest(1, "Ann", Some(42))),
            room: Some(room(101, "Garden", 1)),
            extras: vec![],
        },
        Reservation {
            id: 2,
            checkin_date: date(2019, 2, 4),
            checkout_date: datetime(2019, 2, 6, 11),
            guest: None,
            room: Some(room(102, "Attic", 2)),
            extras: vec![Extra {
                test: Some("Breakfast".into()),
            }],
        },
        Reservation {
            id: 3,
            checkin_date: date(2019, 2, 2),
            checkout_date: datetime(2019, 2, 3, 11),
            guest: Some(guest(2, "Bob", None)),
            room: None,
            extras: vec![],
        },
    ]
}

pub fn buildings() -> Vec<Building> {
    vec![
        Building {
            rooms: Some(vec![room(1, "Garden", 101), room(2, "Attic", 102)]),
            id: 1,
            name: "Main".into(),
        },
        Building {
            rooms: None,
            id: 2,
            name: "Annex".into(),
        },
        Building {
            rooms: Some(vec![]),
            id: 3,
            name: "Cottage".into(),
        },
    ]
}
