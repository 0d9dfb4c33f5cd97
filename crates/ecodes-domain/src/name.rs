use uuid::Uuid;

/// Raised when a sibling entity already uses the candidate name.
#[derive(Debug, thiserror::Error)]
#[error("\"{name}\" is already taken")]
pub struct NameExists {
    pub name: String,
}

/// Case-insensitive uniqueness check over a sibling map.
///
/// Scans `siblings` and rejects on the first entry whose name matches
/// `candidate` case-insensitively, skipping `exclude_id` so an entity never
/// conflicts with itself on rename. Any match is a definitive rejection, so
/// map iteration order does not matter.
pub fn ensure_unique_name<'a, I>(
    candidate: &str,
    exclude_id: Option<Uuid>,
    siblings: I,
) -> Result<(), NameExists>
where
    I: IntoIterator<Item = (&'a Uuid, &'a str)>,
{
    let wanted = candidate.to_lowercase();
    for (id, name) in siblings {
        if Some(*id) == exclude_id {
            continue;
        }
        if name.to_lowercase() == wanted {
            return Err(NameExists {
                name: candidate.to_owned(),
            });
        }
    }
    Ok(())
}
