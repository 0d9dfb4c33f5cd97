//! Fixed paths of the persisted per-organization layout.
//!
//! Primary collections: `users`, `departments`, `buildings` (with nested
//! `floors`). Aggregates: the organization document itself (embedding
//! `departmentsMap` and `buildingsMap`), and the two sibling map documents
//! under `maps/`. Privileged-operation intents live under `outbox/`.

use uuid::Uuid;

use crate::path::DocPath;

pub fn org_doc(org_id: Uuid) -> DocPath {
    DocPath::new("orgs").child(org_id)
}

pub fn departments(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("departments")
}

pub fn department_doc(org_id: Uuid, dept_id: Uuid) -> DocPath {
    departments(org_id).child(dept_id)
}

pub fn buildings(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("buildings")
}

pub fn building_doc(org_id: Uuid, building_id: Uuid) -> DocPath {
    buildings(org_id).child(building_id)
}

pub fn floors(org_id: Uuid, building_id: Uuid) -> DocPath {
    building_doc(org_id, building_id).child("floors")
}

pub fn floor_doc(org_id: Uuid, building_id: Uuid, floor_id: Uuid) -> DocPath {
    floors(org_id, building_id).child(floor_id)
}

pub fn users(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("users")
}

pub fn user_doc(org_id: Uuid, user_id: Uuid) -> DocPath {
    users(org_id).child(user_id)
}

pub fn department_users_doc(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("maps").child("departmentUsers")
}

pub fn codes_doc(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("maps").child("ecodes")
}

pub fn outbox(org_id: Uuid) -> DocPath {
    org_doc(org_id).child("outbox")
}

pub fn outbox_doc(org_id: Uuid, op_id: Uuid) -> DocPath {
    outbox(org_id).child(op_id)
}
