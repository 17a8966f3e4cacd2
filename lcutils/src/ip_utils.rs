use get_if_addrs::get_if_addrs;
use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Ouvre un socket UDP et le "connecte" vers `8.8.8.8:80` : aucun paquet n'est
/// émis, mais le système choisit l'interface de sortie, dont on lit l'adresse.
///
/// # Returns
///
/// L'adresse IP locale, ou `"127.0.0.1"` si elle ne peut pas être déterminée.
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Liste les adresses IPv4 non-loopback de toutes les interfaces.
///
/// Utilisé au démarrage pour afficher les URLs joignables depuis le réseau
/// local. Les adresses sont triées et dédoublonnées.
pub fn list_local_ips() -> Vec<String> {
    let mut result = Vec::new();

    if let Ok(interfaces) = get_if_addrs() {
        for iface in interfaces {
            let ip = iface.ip();
            if ip.is_loopback() || !ip.is_ipv4() {
                continue;
            }
            result.push(ip.to_string());
        }
    }

    result.sort();
    result.dedup();
    result
}
