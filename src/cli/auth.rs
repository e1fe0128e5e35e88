//! CLI auth command handlers for login, signup, status, and logout.

use std::io::BufRead;

use crate::auth::Session;
use crate::client::NewUser;

use super::SignupArgs;

/// Handle `commonthread login <username>`.
pub async fn handle_login(
    session: &Session,
    username: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = password_or_prompt(password)?;
    session.login(username, &password).await?;
    println!("✅ Logged in as {username}");
    Ok(())
}

/// Handle `commonthread signup <username>`.
pub async fn handle_signup(
    session: &Session,
    args: SignupArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = password_or_prompt(args.password)?;
    let user = NewUser::builder()
        .username(args.username)
        .password(password)
        .maybe_email(args.email)
        .maybe_first_name(args.first_name)
        .maybe_last_name(args.last_name)
        .maybe_city(args.city)
        .build();

    let user_id = session.client().signup(&user).await?;
    println!("✅ Created user #{user_id}; log in with `commonthread login {}`", user.username);
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> std::io::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Handle `commonthread status`.
pub fn handle_status(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    if session.is_authenticated() {
        println!("Logged in ({})", session.client().base_url());
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Handle `commonthread logout`.
pub fn handle_logout(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    session.logout()?;
    println!("Logged out");
    Ok(())
}
