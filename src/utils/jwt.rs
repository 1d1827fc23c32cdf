//! Utilidades JWT
//!
//! Firma y verificación de tokens HS256. Los errores de verificación se
//! distinguen por `ErrorKind`, no por el texto del mensaje.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::errors::AppError;

/// Sujeto del token: `[{idFuncionario}, {idPersona}, {idAplicacion}, {ci}]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Funcionario {
        #[serde(rename = "idFuncionario")]
        id_funcionario: i32,
    },
    Persona {
        #[serde(rename = "idPersona")]
        id_persona: i32,
    },
    Aplicacion {
        #[serde(rename = "idAplicacion")]
        id_aplicacion: i32,
    },
    Documento {
        ci: String,
    },
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Vec<Subject>,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(
        funcionario_id: i32,
        persona_id: i32,
        aplicacion_id: i32,
        ci: &str,
        iat: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            sub: vec![
                Subject::Funcionario { id_funcionario: funcionario_id },
                Subject::Persona { id_persona: persona_id },
                Subject::Aplicacion { id_aplicacion: aplicacion_id },
                Subject::Documento { ci: ci.to_string() },
            ],
            iat,
            exp: iat + lifetime_secs,
        }
    }

    pub fn funcionario_id(&self) -> Option<i32> {
        self.sub.iter().find_map(|s| match s {
            Subject::Funcionario { id_funcionario } => Some(*id_funcionario),
            _ => None,
        })
    }

    pub fn persona_id(&self) -> Option<i32> {
        self.sub.iter().find_map(|s| match s {
            Subject::Persona { id_persona } => Some(*id_persona),
            _ => None,
        })
    }

    pub fn aplicacion_id(&self) -> Option<i32> {
        self.sub.iter().find_map(|s| match s {
            Subject::Aplicacion { id_aplicacion } => Some(*id_aplicacion),
            _ => None,
        })
    }

    pub fn ci(&self) -> Option<&str> {
        self.sub.iter().find_map(|s| match s {
            Subject::Documento { ci } => Some(ci.as_str()),
            _ => None,
        })
    }

    /// Funcionario y aplicación del token, o error si faltan
    pub fn funcionario_aplicacion(&self) -> Result<(i32, i32), TokenError> {
        match (self.funcionario_id(), self.aplicacion_id()) {
            (Some(funcionario), Some(aplicacion)) => Ok((funcionario, aplicacion)),
            _ => Err(TokenError::Invalido("el token no identifica al funcionario".to_string())),
        }
    }
}

/// Fallos de verificación de un token
#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("invalid signature")]
    FirmaInvalida,

    #[error("jwt expired")]
    Caducado,

    #[error("invalid token: {0}")]
    Invalido(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::FirmaInvalida,
            ErrorKind::ExpiredSignature => TokenError::Caducado,
            _ => TokenError::Invalido(e.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::FirmaInvalida => {
                AppError::unauthorized("Token no es válido.", "token", "La firma del token no es válida.")
            }
            TokenError::Caducado => {
                AppError::unauthorized("Token caducado.", "token", "El token enviado a expirado.")
            }
            TokenError::Invalido(detalle) => AppError::unauthorized("Token inválido.", "token", detalle),
        }
    }
}

/// Servicio de firma y verificación
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn firmar(&self, claims: &JwtClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
    }

    /// Verifica firma y expiración
    pub fn verificar(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.decodificar(token, true)
    }

    /// Verifica solo la firma; se usa para cerrar sesiones de tokens caducados
    pub fn verificar_ignorando_expiracion(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.decodificar(token, false)
    }

    fn decodificar(&self, token: &str, validar_expiracion: bool) -> Result<JwtClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validar_expiracion;

        let data = decode::<JwtClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

/// Extraer token del header Authorization
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(iat: i64, lifetime: i64) -> JwtClaims {
        JwtClaims::new(10, 20, 30, "1234567", iat, lifetime)
    }

    #[test]
    fn test_sign_and_verify_roundtrip_subjects() {
        let service = JwtService::new("secreto");
        let now = chrono::Utc::now().timestamp();
        let token = service.firmar(&claims(now, 3600)).unwrap();

        let decoded = service.verificar(&token).unwrap();
        assert_eq!(decoded.funcionario_id(), Some(10));
        assert_eq!(decoded.persona_id(), Some(20));
        assert_eq!(decoded.aplicacion_id(), Some(30));
        assert_eq!(decoded.ci(), Some("1234567"));
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn test_subject_wire_format() {
        let value = serde_json::to_value(claims(0, 60)).unwrap();
        assert_eq!(value["sub"][0]["idFuncionario"], 10);
        assert_eq!(value["sub"][1]["idPersona"], 20);
        assert_eq!(value["sub"][2]["idAplicacion"], 30);
        assert_eq!(value["sub"][3]["ci"], "1234567");
    }

    #[test]
    fn test_expired_token_is_discriminated() {
        let service = JwtService::new("secreto");
        let now = chrono::Utc::now().timestamp();
        let token = service.firmar(&claims(now - 7200, 60)).unwrap();

        assert_eq!(service.verificar(&token).unwrap_err(), TokenError::Caducado);
        let decoded = service.verificar_ignorando_expiracion(&token).unwrap();
        assert_eq!(decoded.funcionario_id(), Some(10));
    }

    #[test]
    fn test_foreign_signature_is_discriminated() {
        let now = chrono::Utc::now().timestamp();
        let token = JwtService::new("otro").firmar(&claims(now, 60)).unwrap();

        let service = JwtService::new("secreto");
        assert_eq!(service.verificar(&token).unwrap_err(), TokenError::FirmaInvalida);
        assert_eq!(
            service.verificar_ignorando_expiracion(&token).unwrap_err(),
            TokenError::FirmaInvalida
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = JwtService::new("secreto");
        assert!(matches!(service.verificar("no-es-un-jwt"), Err(TokenError::Invalido(_))));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }
}
