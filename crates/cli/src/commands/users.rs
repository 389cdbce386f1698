//! User commands.

use std::io::{self, Write};

use catalogix_core::{NewUser, User, UserId};
use catalogix_frontend::api::{ApiClient, CatalogBackend};
use catalogix_frontend::listing::Confirmation;

use super::{CliError, confirm};

/// Print every user.
pub async fn list(client: &ApiClient) -> Result<(), CliError> {
    let users = client.list_users().await?.into_items();
    write_users(&mut io::stdout().lock(), &users)?;
    Ok(())
}

/// Register a user and print the created record.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: String,
) -> Result<(), CliError> {
    let new_user = NewUser::parse(name, email, password)?;
    let created = client.register_user(&new_user).await?;
    tracing::info!(user_id = %created.id, "User registered");
    write_users(&mut io::stdout().lock(), std::slice::from_ref(&created))?;
    Ok(())
}

/// Delete a user after confirmation.
pub async fn delete(client: &ApiClient, id: UserId, yes: bool) -> Result<(), CliError> {
    if confirm("Delete this user?", yes)? == Confirmation::Declined {
        tracing::info!("Cancelled");
        return Ok(());
    }

    client.delete_user(id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}

fn write_users(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "No users found.");
    }

    writeln!(out, "{:<8} {:<24} EMAIL", "ID", "NAME")?;
    for user in users {
        let email = user.email.as_ref().map_or("", |e| e.as_str());
        writeln!(out, "{:<8} {:<24} {}", user.id, user.name, email)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogix_core::Email;

    use super::*;

    fn render(users: &[User]) -> String {
        let mut out = Vec::new();
        write_users(&mut out, users).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_user_table() {
        assert_eq!(render(&[]), "No users found.\n");
    }

    #[test]
    fn test_user_table_rows() {
        let users = [
            User {
                id: UserId::new(1),
                name: "Alice".to_string(),
                email: Some(Email::parse("alice@example.com").unwrap()),
            },
            User {
                id: UserId::new(2),
                name: "Bob".to_string(),
                email: None,
            },
        ];
        let table = render(&users);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].ends_with("alice@example.com"));
        assert!(lines[2].contains("Bob"));
    }
}
