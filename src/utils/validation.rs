//! Utilidades de validación
//!
//! Política de contraseñas, generación de códigos de verificación,
//! ventana de validez de códigos y enmascarado de celulares.

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

lazy_static! {
    static ref DIGITO: Regex = Regex::new(r"\d").expect("regex de dígitos");
    static ref MAYUSCULA: Regex = Regex::new(r"[A-Z]").expect("regex de mayúsculas");
    static ref MINUSCULA: Regex = Regex::new(r"[a-z]").expect("regex de minúsculas");
    static ref ESPECIAL: Regex = Regex::new(r"[^a-zA-Z0-9]").expect("regex de caracteres especiales");
}

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 15;

pub const CODIGO_MIN: i32 = 100_000;
pub const CODIGO_MAX: i32 = 999_999;

/// La contraseña tiene entre 8 y 15 caracteres y al menos tres de las
/// cuatro clases: dígito, mayúscula, minúscula, carácter especial.
pub fn cumple_politica_password(password: &str) -> bool {
    let longitud = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&longitud) {
        return false;
    }

    let clases = [&*DIGITO, &*MAYUSCULA, &*MINUSCULA, &*ESPECIAL]
        .iter()
        .filter(|clase| clase.is_match(password))
        .count();

    clases >= 3
}

/// Código numérico de 6 dígitos
pub fn generar_codigo() -> i32 {
    rand::thread_rng().gen_range(CODIGO_MIN..CODIGO_MAX)
}

/// Un código es válido mientras `ahora < creado + minutos`
pub fn codigo_vigente(creado: DateTime<Utc>, ahora: DateTime<Utc>, minutos: i64) -> bool {
    ahora < creado + Duration::minutes(minutos)
}

/// `71234567` -> `7*****67`
pub fn enmascarar_celular(celular: &str) -> String {
    let caracteres: Vec<char> = celular.chars().collect();
    let Some(primero) = caracteres.first() else {
        return String::new();
    };
    let cola: String = caracteres.iter().skip(6).take(2).collect();
    format!("{}*****{}", primero, cola)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy_accepts_three_classes() {
        assert!(cumple_politica_password("Passw0rd!"));
        assert!(cumple_politica_password("Passw0rdx"));
        assert!(cumple_politica_password("passw0rd!"));
        assert!(cumple_politica_password("PASSWORD1!"));
    }

    #[test]
    fn test_password_policy_rejects_two_classes() {
        assert!(!cumple_politica_password("password1"));
        assert!(!cumple_politica_password("Passwordx"));
        assert!(!cumple_politica_password("12345678!"));
    }

    #[test]
    fn test_password_policy_length_bounds() {
        assert!(!cumple_politica_password("Pa0!"));
        assert!(cumple_politica_password("Pas0!xyz"));
        assert!(cumple_politica_password("Passw0rd!Passw0"));
        assert!(!cumple_politica_password("Passw0rd!Passw0r"));
    }

    #[test]
    fn test_generated_codes_have_six_digits() {
        for _ in 0..2_000 {
            let codigo = generar_codigo();
            assert!((CODIGO_MIN..=CODIGO_MAX).contains(&codigo));
            assert_eq!(codigo.to_string().len(), 6);
        }
    }

    #[test]
    fn test_code_window_is_strict() {
        let creado = Utc::now();
        assert!(codigo_vigente(creado, creado, 5));
        assert!(codigo_vigente(creado, creado + Duration::minutes(5) - Duration::seconds(1), 5));
        assert!(!codigo_vigente(creado, creado + Duration::minutes(5), 5));
        assert!(!codigo_vigente(creado, creado + Duration::minutes(6), 5));
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(enmascarar_celular("71234567"), "7*****67");
        assert_eq!(enmascarar_celular("7123"), "7*****");
        assert_eq!(enmascarar_celular(""), "");
    }
}
