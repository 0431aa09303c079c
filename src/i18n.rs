use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::Rule;

/// Language used for validation messages and notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale '{}'", self.0)
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "pt-br" | "pt" => Ok(Locale::PtBr),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl Locale {
    /// BCP 47 tag, used for the `lang` attribute of rendered pages.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::PtBr => "pt-BR",
        }
    }
}

/// Outcome messages pushed to the notification outbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    UserCreated,
    UserUpdated,
    UserDeleted,
    PermissionCreated,
    RolePermissionsSynced,
    UnknownPermissionsSkipped,
}

pub fn notice_message(notice: Notice, locale: Locale) -> &'static str {
    match (locale, notice) {
        (Locale::En, Notice::UserCreated) => "User created successfully!",
        (Locale::En, Notice::UserUpdated) => "User updated successfully!",
        (Locale::En, Notice::UserDeleted) => "User deleted successfully!",
        (Locale::En, Notice::PermissionCreated) => "Permission created successfully!",
        (Locale::En, Notice::RolePermissionsSynced) => "Role permissions updated.",
        (Locale::En, Notice::UnknownPermissionsSkipped) => "Some selected permissions no longer exist and were skipped.",
        (Locale::PtBr, Notice::UserCreated) => "Usuário criado com sucesso!",
        (Locale::PtBr, Notice::UserUpdated) => "Usuário atualizado com sucesso!",
        (Locale::PtBr, Notice::UserDeleted) => "Usuário deletado com sucesso!",
        (Locale::PtBr, Notice::PermissionCreated) => "Permissão criada com sucesso!",
        (Locale::PtBr, Notice::RolePermissionsSynced) => "Permissões da função atualizadas.",
        (Locale::PtBr, Notice::UnknownPermissionsSkipped) => "Algumas permissões selecionadas não existem mais e foram ignoradas.",
    }
}

pub fn rule_message(rule: Rule, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match rule {
            Rule::NameRequired => "The name field is required.",
            Rule::NameMax => "The name may not be greater than 255 characters.",
            Rule::EmailRequired => "The email field is required.",
            Rule::EmailFormat => "The email must be a valid email address.",
            Rule::EmailMax => "The email may not be greater than 255 characters.",
            Rule::EmailUnique => "The email has already been taken.",
            Rule::PasswordRequired => "The password field is required.",
            Rule::PasswordMin => "The password must be at least 8 characters.",
            Rule::PasswordConfirmed => "The password confirmation does not match.",
            Rule::SlugRequired => "The slug field is required.",
            Rule::SlugFormat => "The slug may only contain lowercase letters, numbers, dots, dashes and underscores.",
            Rule::SlugMax => "The slug may not be greater than 255 characters.",
            Rule::SlugUnique => "The slug has already been taken.",
        },
        Locale::PtBr => match rule {
            Rule::NameRequired => "O campo nome é obrigatório.",
            Rule::NameMax => "O campo nome deve ter no máximo 255 caracteres.",
            Rule::EmailRequired => "O campo email é obrigatório.",
            Rule::EmailFormat => "O campo email deve ser um email válido.",
            Rule::EmailMax => "O campo email deve ter no máximo 255 caracteres.",
            Rule::EmailUnique => "O email informado já está em uso.",
            Rule::PasswordRequired => "O campo senha é obrigatório.",
            Rule::PasswordMin => "O campo senha deve ter no mínimo 8 caracteres.",
            Rule::PasswordConfirmed => "As senhas não conferem.",
            Rule::SlugRequired => "O campo slug é obrigatório.",
            Rule::SlugFormat => "O slug só pode conter letras minúsculas, números, pontos, hífens e sublinhados.",
            Rule::SlugMax => "O campo slug deve ter no máximo 255 caracteres.",
            Rule::SlugUnique => "O slug informado já está em uso.",
        },
    }
}
